use std::time::Duration;
use anyhow::Result;
use clap::{Parser, Subcommand};
use pollbox_client::PollboxClient;

#[derive(Parser, Debug)]
#[command(name = "pollbox-client")]
struct Cli {
    #[arg(long, env = "POLLBOX_ADDR", default_value = "127.0.0.1:9093")]
    addr: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a request and print its key.
    Submit { method: String, path: String },

    /// Poll for the response to a key.
    Poll {
        key: String,
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
        #[arg(long, default_value_t = 1)]
        attempts: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut client = PollboxClient::connect(&cli.addr).await?;

    match cli.command {
        Command::Submit { method, path } => {
            let key = client.create_request(&method, &path).await?;
            println!("{}", key);
        }
        Command::Poll {
            key,
            interval_ms,
            attempts,
        } => {
            match client
                .poll_response(&key, Duration::from_millis(interval_ms), attempts)
                .await?
            {
                Some(reply) => {
                    println!("{}", reply.status_code);
                    if let Some(body) = reply.body {
                        println!("{}", body);
                    }
                }
                None => println!("204"),
            }
        }
    }
    Ok(())
}
