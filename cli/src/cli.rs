use std::path::PathBuf;

use clap::{Parser, Subcommand};
use corpus_xml::{EscapeMode, OrderPolicy};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a morphology corpus file into nested chapter/verse/token XML
    Convert(ConvertArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    #[clap(index = 1)]
    /// Corpus file to read. Use `-` for stdin.
    pub source: PathBuf,

    #[clap(index = 2)]
    /// Where to write the XML. Use `-` for stdout. Defaults to ./corpus.xml.
    pub destination: Option<PathBuf>,

    #[clap(short, long, env = "CORPUS_XML_CONFIG")]
    /// JSON file with conversion options.
    pub config: Option<PathBuf>,

    #[clap(long)]
    /// Ordering contract: `strict` rejects out-of-order records, `lenient` emits them as is.
    pub order: Option<OrderPolicy>,

    #[clap(long)]
    /// Escaping of text and attribute values: `none` or `xml`.
    pub escape: Option<EscapeMode>,

    #[clap(long)]
    /// Treat every line as a record instead of skipping comments and the header row.
    pub keep_preamble: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ConvertArgs {
        let args = Args::try_parse_from(args).unwrap();
        match args.command {
            Some(Command::Convert(args)) => args,
            None => panic!("no command"),
        }
    }

    #[test]
    fn test_source_only() {
        let args = parse(&["corpus-xml", "convert", "morphology.txt"]);
        assert_eq!(args.source, PathBuf::from("morphology.txt"));
        assert_eq!(args.destination, None);
        assert_eq!(args.order, None);
        assert!(!args.keep_preamble);
    }

    #[test]
    fn test_all_options() {
        let args = parse(&[
            "corpus-xml",
            "convert",
            "in.txt",
            "out.xml",
            "--order",
            "lenient",
            "--escape",
            "xml",
            "--keep-preamble",
            "-c",
            "options.json",
        ]);
        assert_eq!(args.destination, Some(PathBuf::from("out.xml")));
        assert_eq!(args.order, Some(OrderPolicy::Lenient));
        assert_eq!(args.escape, Some(EscapeMode::Xml));
        assert!(args.keep_preamble);
        assert_eq!(args.config, Some(PathBuf::from("options.json")));
    }

    #[test]
    fn test_bad_policy() {
        assert!(Args::try_parse_from(["corpus-xml", "convert", "in.txt", "--order", "random"]).is_err());
    }

    #[test]
    fn test_missing_source() {
        assert!(Args::try_parse_from(["corpus-xml", "convert"]).is_err());
    }
}
