// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use cachefetch_config::Config;
use cachefetch_downloader::{
    Checksum, Client, ClientConfig, Downloader, LocalGuest, Request, Terminal,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};

fn build_cli() -> Command {
    Command::new("cachefetch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Content-addressed, resumable download cache")
        .arg(
            Arg::new("cache-dir")
                .short('c')
                .long("cache-dir")
                .value_name("PATH")
                .help("Cache root directory (defaults to the platform cache dir)")
                .global(true),
        )
        .subcommand(
            Command::new("fetch")
                .about("Download a URL into the cache and print the cached path")
                .arg(Arg::new("url").required(true).value_name("URL").help("Resource to download"))
                .arg(
                    Arg::new("checksum-url")
                        .long("checksum-url")
                        .value_name("URL")
                        .help("Checksum document to verify the download against"),
                )
                .arg(
                    Arg::new("sha512")
                        .long("sha512")
                        .help("Checksum document carries SHA-512 digests")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("copy")
                .about("Fetch a URL (or take a local file) and copy it to a destination")
                .arg(
                    Arg::new("source")
                        .required(true)
                        .value_name("URL|PATH")
                        .help("Resource URL, or an absolute local path to copy as-is"),
                )
                .arg(Arg::new("dest").required(true).value_name("PATH").help("Absolute destination path"))
                .arg(
                    Arg::new("checksum-url")
                        .long("checksum-url")
                        .value_name("URL")
                        .help("Checksum document to verify the download against"),
                )
                .arg(
                    Arg::new("sha512")
                        .long("sha512")
                        .help("Checksum document carries SHA-512 digests")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn build_request(matches: &ArgMatches, url_arg: &str) -> Result<Request> {
    let url = matches
        .get_one::<String>(url_arg)
        .ok_or_else(|| anyhow::anyhow!("URL is required"))?;

    let mut request = Request::new(url);
    if let Some(checksum_url) = matches.get_one::<String>("checksum-url") {
        let checksum = if matches.get_flag("sha512") {
            Checksum::sha512(checksum_url)
        } else {
            Checksum::sha256(checksum_url)
        };
        request = request.with_checksum(checksum);
    }

    Ok(request)
}

// replaces the in-place progress line with whatever is printed next
fn finish_progress_line(terminal: &Terminal) {
    if terminal.is_terminal() {
        println!();
        terminal.clear_line();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = build_cli().get_matches();

    let config = Config::load_default().context("Failed to load configuration")?;
    let cache_root = match matches.get_one::<String>("cache-dir") {
        Some(dir) => PathBuf::from(dir),
        None => config
            .cache
            .resolved_root()
            .context("Failed to resolve cache directory")?,
    };

    let client = Client::with_config(ClientConfig {
        connect_timeout: config.download.connect_timeout(),
        read_timeout: config.download.read_timeout(),
        ..ClientConfig::default()
    })
    .context("Failed to build HTTP client")?;

    let terminal = Terminal::detect();
    let downloader = Downloader::new(client, cache_root, terminal.clone());

    match matches.subcommand() {
        Some(("fetch", sub)) => {
            let request = build_request(sub, "url")?;
            let path = downloader.fetch(&request).await?;
            finish_progress_line(&terminal);
            println!("{}", path.display());
            Ok(())
        }
        Some(("copy", sub)) => {
            let request = build_request(sub, "source")?;
            let dest = sub
                .get_one::<String>("dest")
                .ok_or_else(|| anyhow::anyhow!("Destination is required"))?;
            downloader
                .fetch_to(&LocalGuest, &request, Path::new(dest))
                .await?;
            finish_progress_line(&terminal);
            Ok(())
        }
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_build_request_with_checksum() {
        let matches = build_cli().get_matches_from([
            "cachefetch",
            "fetch",
            "https://example.com/file",
            "--checksum-url",
            "https://example.com/file.sha256",
        ]);
        let (_, sub) = matches.subcommand().expect("subcommand parsed");

        let request = build_request(sub, "url").expect("request built");
        assert_eq!(request.url, "https://example.com/file");
        assert!(request.checksum.is_some());
    }

    #[test]
    fn test_build_request_plain() {
        let matches =
            build_cli().get_matches_from(["cachefetch", "copy", "/local/file", "/dest/file"]);
        let (_, sub) = matches.subcommand().expect("subcommand parsed");

        let request = build_request(sub, "source").expect("request built");
        assert_eq!(request.url, "/local/file");
        assert!(request.checksum.is_none());
    }
}
