//! Stream drivers: feed lines to the emitter, one at a time.

use std::io::{BufRead, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    emitter::{ElementKind, Emitter},
    error::{Error, Result},
    options::ConvertOptions,
    record::{is_preamble, parse_line},
};

/// Output buffered in memory before it is handed to the async sink.
pub const FLUSH_THRESHOLD: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Lines read, including skipped ones.
    pub lines: usize,
    pub records: usize,
    pub skipped: usize,
    pub chapters: usize,
    pub verses: usize,
    pub tokens: usize,
}

struct Feeder<W: Write> {
    emitter: Emitter<W>,
    stats: ConvertStats,
    skip_preamble: bool,
}

impl<W: Write> Feeder<W> {
    fn new(sink: W, options: &ConvertOptions) -> Result<Self> {
        Ok(Self {
            emitter: Emitter::new(sink, options.escape, options.order)?,
            stats: ConvertStats::default(),
            skip_preamble: options.skip_preamble,
        })
    }

    fn feed(&mut self, line: &str) -> Result<()> {
        self.stats.lines += 1;
        let line_no = self.stats.lines;

        if self.skip_preamble && is_preamble(line) {
            self.stats.skipped += 1;
            return Ok(());
        }

        let record = parse_line(line).map_err(|source| Error::MalformedRecord {
            line: line_no,
            source,
        })?;
        self.emitter.emit(&record, line_no)?;
        self.stats.records += 1;

        Ok(())
    }

    fn finish(self) -> Result<(W, ConvertStats)> {
        let mut stats = self.stats;
        stats.chapters = self.emitter.opened(ElementKind::Chapter);
        stats.verses = self.emitter.opened(ElementKind::Verse);
        stats.tokens = self.emitter.opened(ElementKind::Token);

        let sink = self.emitter.finish()?;
        tracing::info!(
            "Converted {} records ({} chapters, {} verses, {} tokens), skipped {} lines",
            stats.records,
            stats.chapters,
            stats.verses,
            stats.tokens,
            stats.skipped
        );
        Ok((sink, stats))
    }
}

/// Convert a corpus read from `input`, writing markup to `output`.
///
/// Memory use is bounded by [`FLUSH_THRESHOLD`] regardless of input size.
/// On failure everything produced before the failing line has been written
/// and the document is left unterminated.
pub async fn convert<R, W>(input: R, mut output: W, options: &ConvertOptions) -> Result<ConvertStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut feeder = Feeder::new(Vec::with_capacity(FLUSH_THRESHOLD), options)?;
    let mut lines = input.lines();

    let outcome = async {
        while let Some(line) = lines.next_line().await? {
            feeder.feed(&line)?;
            if feeder.emitter.sink().len() >= FLUSH_THRESHOLD {
                drain(feeder.emitter.sink_mut(), &mut output).await?;
            }
        }
        Ok::<(), Error>(())
    }
    .await;

    if let Err(e) = outcome {
        if let Err(io) = drain(feeder.emitter.sink_mut(), &mut output).await {
            tracing::warn!("Could not write partial output: {io}");
        }
        let _ = output.flush().await;
        return Err(e);
    }

    let (rest, stats) = feeder.finish()?;
    output.write_all(&rest).await?;
    output.flush().await?;

    Ok(stats)
}

async fn drain<W: AsyncWrite + Unpin>(buf: &mut Vec<u8>, output: &mut W) -> std::io::Result<()> {
    output.write_all(buf).await?;
    buf.clear();
    Ok(())
}

/// Blocking variant of [`convert`] for synchronous readers and writers.
pub fn convert_blocking<R, W>(input: R, output: W, options: &ConvertOptions) -> Result<ConvertStats>
where
    R: BufRead,
    W: Write,
{
    let mut feeder = Feeder::new(output, options)?;
    for line in input.lines() {
        feeder.feed(&line?)?;
    }
    let (mut output, stats) = feeder.finish()?;
    output.flush()?;
    Ok(stats)
}

/// Convert an in-memory corpus to a markup string.
pub fn convert_str(input: &str, options: &ConvertOptions) -> Result<String> {
    let mut out = Vec::with_capacity(input.len() * 2);
    convert_blocking(input.as_bytes(), &mut out, options)?;
    String::from_utf8(out)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OrderPolicy;

    const VERSE: &str = "(1:1:1:1)\tbi\tP\tPREFIX|bi+\n\
                         (1:1:1:2)\tsomi\tN\tSTEM|POS:N|LEM:{som|ROOT:smw|M|GEN\n\
                         (1:1:2:1)\t{ll~ahi\tPN\tSTEM|POS:PN|LEM:{ll~ah|ROOT:Alh|GEN\n";

    #[test]
    fn test_stats() {
        let mut out = Vec::new();
        let stats = convert_blocking(VERSE.as_bytes(), &mut out, &ConvertOptions::default()).unwrap();

        assert_eq!(
            stats,
            ConvertStats {
                lines: 3,
                records: 3,
                skipped: 0,
                chapters: 1,
                verses: 1,
                tokens: 2,
            }
        );
    }

    #[test]
    fn test_preamble_skipped() {
        let input = format!(
            "# Quranic Arabic Corpus\n#\n\nLOCATION\tFORM\tTAG\tFEATURES\n{VERSE}"
        );
        let mut out = Vec::new();
        let stats = convert_blocking(input.as_bytes(), &mut out, &ConvertOptions::default()).unwrap();
        assert_eq!(stats.records, 3);
        assert_eq!(stats.skipped, 4);
    }

    #[test]
    fn test_preamble_rejected_when_not_skipping() {
        let options = ConvertOptions {
            skip_preamble: false,
            ..Default::default()
        };
        let err = convert_str("# comment\n", &options).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_error_line_numbers_count_skipped_lines() {
        let input = "# header\n(1:1:1:1)\tbi\tP\tPREFIX\nbisim\tN\tPOS:N\n";
        let err = convert_str(input, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_blocking_and_str_agree() {
        let mut out = Vec::new();
        convert_blocking(VERSE.as_bytes(), &mut out, &ConvertOptions::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            convert_str(VERSE, &ConvertOptions::default()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_async_matches_blocking() {
        let mut out = Vec::new();
        let stats = convert(VERSE.as_bytes(), &mut out, &ConvertOptions::default())
            .await
            .unwrap();

        assert_eq!(stats.records, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            convert_str(VERSE, &ConvertOptions::default()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_async_large_input_is_flushed_in_chunks() {
        let mut input = String::new();
        for c in 1..=20u32 {
            for v in 1..=20u32 {
                for t in 1..=10u32 {
                    input.push_str(&format!("({c}:{v}:{t}:1)\tbi\tP\tPREFIX|bi+\n"));
                }
            }
        }

        let mut out = Vec::new();
        let stats = convert(input.as_bytes(), &mut out, &ConvertOptions::default())
            .await
            .unwrap();

        assert_eq!(stats.records, 4000);
        assert!(out.len() > FLUSH_THRESHOLD);
        assert_eq!(String::from_utf8(out).unwrap(), convert_str(&input, &ConvertOptions::default()).unwrap());
    }

    #[tokio::test]
    async fn test_async_partial_output_on_error() {
        let input = "(1:1:1:1)\tbi\tP\tPREFIX\n(1:1:1:1)\tbi\tP\tPREFIX\n";
        let mut out = Vec::new();
        let options = ConvertOptions {
            order: OrderPolicy::Strict,
            ..Default::default()
        };

        let err = convert(input.as_bytes(), &mut out, &options).await.unwrap_err();
        assert!(matches!(err, Error::OutOfOrderRecord { line: 2, .. }));

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("<token index=\"1\">"));
        assert!(!out.contains("</corpus>"));
        assert_eq!(out.matches("<bit ").count(), 1);
    }
}
