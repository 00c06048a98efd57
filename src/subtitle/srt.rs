use crate::error::{SubcueError, SubcueResult};
use crate::subtitle::timestamp::{format_timestamp, parse_timestamp};
use crate::subtitle::Cue;
use std::io::Write;

/// A cue as it appears in an SRT file: text only, no word timings.
#[derive(Debug, Clone, PartialEq)]
pub struct SrtBlock {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub lines: Vec<String>,
}

impl From<&Cue> for SrtBlock {
    fn from(cue: &Cue) -> Self {
        Self {
            index: cue.index,
            start: cue.start,
            end: cue.end,
            lines: cue.text_lines(),
        }
    }
}

/// Render cues as an SRT document. Each block ends with a blank line.
pub fn to_srt(cues: &[Cue]) -> SubcueResult<String> {
    let mut out = String::new();
    for cue in cues {
        out.push_str(&format!("{}\n", cue.index));
        out.push_str(&format!(
            "{} --> {}\n",
            format_timestamp(cue.start)?,
            format_timestamp(cue.end)?,
        ));
        for line in &cue.lines {
            out.push_str(&line.text());
            out.push('\n');
        }
        out.push('\n');
    }
    Ok(out)
}

/// Serialize cues into a caller-supplied sink. Nothing is written if any
/// timestamp is invalid.
pub fn write_srt<W: Write>(sink: &mut W, cues: &[Cue]) -> SubcueResult<()> {
    let srt = to_srt(cues)?;
    sink.write_all(srt.as_bytes())?;
    sink.flush()?;
    Ok(())
}

/// Parse an SRT document into blocks. Tolerates a BOM, CRLF line endings,
/// extra blank lines and positioning hints after the end timestamp.
pub fn parse_srt(content: &str) -> SubcueResult<Vec<SrtBlock>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut blocks = Vec::new();
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l.trim_end())).peekable();

    loop {
        while lines.next_if(|(_, l)| l.is_empty()).is_some() {}
        let Some((line_no, index_line)) = lines.next() else {
            break;
        };

        let index = index_line
            .trim()
            .parse::<usize>()
            .map_err(|_| SubcueError::SrtParse {
                line: line_no,
                message: format!("expected cue number, found {index_line:?}"),
            })?;

        let (line_no, timing) = lines.next().ok_or_else(|| SubcueError::SrtParse {
            line: line_no + 1,
            message: "missing timing line".into(),
        })?;
        let (start, end) = parse_timing(timing).map_err(|message| SubcueError::SrtParse {
            line: line_no,
            message,
        })?;

        let mut text = Vec::new();
        while let Some((_, l)) = lines.next_if(|(_, l)| !l.is_empty()) {
            text.push(l.to_string());
        }

        blocks.push(SrtBlock {
            index,
            start,
            end,
            lines: text,
        });
    }

    Ok(blocks)
}

fn parse_timing(line: &str) -> Result<(f64, f64), String> {
    let (left, right) = line
        .split_once("-->")
        .ok_or_else(|| format!("expected \"start --> end\", found {line:?}"))?;
    let right = right.split_whitespace().next().unwrap_or("");
    let start = parse_timestamp(left).map_err(|e| e.to_string())?;
    let end = parse_timestamp(right).map_err(|e| e.to_string())?;
    Ok((start, end))
}
