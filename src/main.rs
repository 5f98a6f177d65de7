use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use log::debug;
use docgen::{DocClient, DocgenConfig};

#[derive(Parser, Debug)]
#[command(name = "docgen")]
#[command(about = "Generate a docstring for a code snippet with a hosted LLM")]
struct Args
{   /// File holding the snippet, stdin when omitted
    input: Option<PathBuf>

  , /// JSON config file; DOCGEN_* variables override its values
    #[arg(short, long)]
    config: Option<PathBuf>

  , /// Print the snippet with the docstring inserted
    #[arg(short, long)]
    insert: bool

  , /// Print the model output without cleanup
    #[arg(long, conflicts_with = "insert")]
    raw: bool
}

fn load_config(args: &Args)
  -> Result<DocgenConfig, docgen::Error>
{   let mut config = match &args.config
    {   Some(path) => DocgenConfig::from_json_file(path)?
      , None => DocgenConfig::default()
    };
    config.apply_lookup(|name| std::env::var(name).ok())?;
    Ok(config)
}

fn read_snippet(args: &Args)
  -> Result<String, Box<dyn std::error::Error>>
{   match &args.input
    {   Some(path) => {
          debug!("Reading snippet from {}", path.display());
          Ok(std::fs::read_to_string(path)?)
        }
      , None => {
          debug!("Reading snippet from stdin");
          let mut buf = String::new();
          std::io::stdin().read_to_string(&mut buf)?;
          Ok(buf)
        }
    }
}

async fn run(args: Args)
  -> Result<(), Box<dyn std::error::Error>>
{   let config = load_config(&args)?;
    let snippet = read_snippet(&args)?;
    let client = DocClient::new(config);

    let generation = if args.insert
    {   client.annotate(&snippet).await?
    } else if args.raw
    {   client.generate(&snippet).await?
    } else
    {   client.docstring(&snippet).await?
    };

    println!("{}", generation.text);
    eprintln!(
      "latency: {:.2} ms, attempts: {}",
      generation.latency_ms(), generation.attempts
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode
{   env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("warn")
    ).init();

    match run(Args::parse()).await
    {   Ok(()) => ExitCode::SUCCESS
      , Err(e) => {
          eprintln!("Error: {}", e);
          ExitCode::FAILURE
        }
    }
}
