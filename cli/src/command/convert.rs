use std::path::{Path, PathBuf};

use anyhow::Context;
use corpus_xml::{ConvertOptions, ConvertStats, DEFAULT_DESTINATION};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};

use crate::{cli::ConvertArgs, shell::Shell};

pub async fn convert(shell: &mut Shell, args: ConvertArgs) -> anyhow::Result<()> {
    let options = resolve_options(&args)?;
    let destination = args
        .destination
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DESTINATION));

    shell.status(
        "Converting",
        format!("{} -> {}", args.source.display(), destination.display()),
    )?;

    match run(&args.source, &destination, &options).await {
        Ok(stats) => {
            shell.status(
                "Finished",
                format!(
                    "{} records in {} chapters, {} verses, {} tokens",
                    stats.records, stats.chapters, stats.verses, stats.tokens
                ),
            )?;
            Ok(())
        }
        Err(e) => {
            shell.error(format!("{:#}", e))?;
            std::process::exit(1);
        }
    }
}

/// Options file first, then command line overrides.
fn resolve_options(args: &ConvertArgs) -> anyhow::Result<ConvertOptions> {
    let mut options = match &args.config {
        Some(path) => ConvertOptions::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => ConvertOptions::default(),
    };

    if let Some(order) = args.order {
        options.order = order;
    }
    if let Some(escape) = args.escape {
        options.escape = escape;
    }
    if args.keep_preamble {
        options.skip_preamble = false;
    }

    tracing::debug!("Conversion options: {:?}", options);
    Ok(options)
}

fn is_std_stream(path: &Path) -> bool {
    path.as_os_str() == "-"
}

async fn run(
    source: &Path,
    destination: &Path,
    options: &ConvertOptions,
) -> anyhow::Result<ConvertStats> {
    let input: Box<dyn AsyncBufRead + Unpin + Send> = if is_std_stream(source) {
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        let file = tokio::fs::File::open(source)
            .await
            .with_context(|| format!("Failed to open {}", source.display()))?;
        Box::new(BufReader::new(file))
    };

    let output: Box<dyn AsyncWrite + Unpin + Send> = if is_std_stream(destination) {
        Box::new(tokio::io::stdout())
    } else {
        let file = tokio::fs::File::create(destination)
            .await
            .with_context(|| format!("Failed to create {}", destination.display()))?;
        Box::new(file)
    };

    let stats = corpus_xml::convert(input, output, options)
        .await
        .with_context(|| format!("Failed to convert {}", source.display()))?;

    Ok(stats)
}
