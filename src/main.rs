use clap::{Parser, Subcommand};
use jemsite::{config, generate, menu, naming, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jemsite")]
#[command(about = "Convert jemdoc-style markup into XHTML pages with a bilingual menu")]
#[command(long_about = "\
Convert jemdoc-style markup into XHTML pages with a bilingual menu

Every document becomes one page. The sidebar menu comes from a MENU file in
the source directory and is localized per page: index.jemdoc gets the English
menu, index_cn.jemdoc the Chinese one.

Site structure:

  site/
  ├── jemsite.toml        # Optional config
  ├── MENU                # Menu description (optional)
  ├── index.jemdoc        # English page  → index.html
  ├── index_cn.jemdoc     # Chinese page  → index_cn.html
  └── research.jemdoc     # ...

MENU format:

  Menu
      Home        [index.html]
  菜单
      主页        [index_cn.html]
  Language
      中文        [index_cn.html]
      English     [index.html]

With an input file, jemsite.toml and MENU are read from the directory holding
it unless --source is given. With no input file every configured page under
--source (default: the current directory) is converted in both languages.

Run 'jemsite gen-config' to generate a documented jemsite.toml.")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Site directory holding the config, menu and manifest pages
    /// [default: the input's directory, or the current directory]
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Markup document to convert (omit to convert every configured page)
    input: Option<PathBuf>,

    /// Output file (defaults to the input with an .html extension)
    #[arg(short, long, requires = "input")]
    output: Option<PathBuf>,

    /// Title for documents without a '# ' title line
    #[arg(long)]
    title: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock jemsite.toml with all options documented
    GenConfig,
    /// Print the parsed menu
    Menu {
        /// Show an indented tree instead of JSON
        #[arg(long)]
        tree: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let source = match (&cli.source, &cli.input) {
        (Some(source), _) => source.clone(),
        (None, Some(input)) => generate::site_dir(input),
        (None, None) => PathBuf::from("."),
    };

    match cli.command {
        Some(Command::GenConfig) => {
            print!("{}", config::stock_config_toml());
        }
        Some(Command::Menu { tree }) => {
            let site_config = config::load_config(&source)?;
            let entries = menu::load_menu(&source.join(&site_config.menu_file))?;
            if tree {
                output::print_menu(&entries);
            } else {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        }
        None => {
            let mut site_config = config::load_config(&source)?;
            if let Some(title) = cli.title {
                site_config.default_title = title;
            }
            match cli.input {
                Some(input) => {
                    let output_path = cli
                        .output
                        .unwrap_or_else(|| naming::html_output_path(&input));
                    let ctx = generate::ConvertContext::new(&source, &site_config);
                    let outcome = generate::convert_file(&input, &output_path, &ctx)?;
                    output::print_outcomes(&[outcome], &source);
                }
                None => {
                    init_thread_pool(&site_config.processing);
                    let outcomes = generate::convert_manifest(&source, &site_config);
                    output::print_outcomes(&outcomes, &source);
                }
            }
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
