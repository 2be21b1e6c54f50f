use crate::error::{StoreError, StoreResult};
use crate::models::Exchange;

const PROMPT_TAG: &str = "PROMPT:";
const ANSWER_TAG: &str = "ANSWER:";
const CONTEXT_TAG: &str = "CONTEXT:";

/// On-disk encoding of a conversation file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConversationFormat {
    /// Blank-line separated blocks of `PROMPT:` / `ANSWER:` / `CONTEXT:` lines.
    ///
    /// Values are escaped (`\\`, `\n`, `\r`) so they stay on one line. Files
    /// written without escaping still load, but a literal `\n` or `\r` in them
    /// (for example `C:\new`) is read back as a line break.
    #[default]
    Tagged,
    /// One JSON object per exchange per line.
    Jsonl,
}

impl ConversationFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ConversationFormat::Tagged => "txt",
            ConversationFormat::Jsonl => "jsonl",
        }
    }

    pub fn encode(&self, exchanges: &[Exchange]) -> StoreResult<String> {
        match self {
            ConversationFormat::Tagged => Ok(encode_tagged(exchanges)),
            ConversationFormat::Jsonl => encode_jsonl(exchanges),
        }
    }

    pub fn decode(&self, content: &str) -> StoreResult<Vec<Exchange>> {
        match self {
            ConversationFormat::Tagged => Ok(decode_tagged(content)),
            ConversationFormat::Jsonl => decode_jsonl(content),
        }
    }
}

fn encode_tagged(exchanges: &[Exchange]) -> String {
    let mut out = String::new();
    for exchange in exchanges {
        for (tag, value) in [
            (PROMPT_TAG, &exchange.prompt),
            (ANSWER_TAG, &exchange.answer),
            (CONTEXT_TAG, &exchange.context),
        ] {
            out.push_str(tag);
            out.push(' ');
            out.push_str(&escape(value));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[derive(Default)]
struct Block {
    prompt: Option<String>,
    answer: Option<String>,
    context: Option<String>,
}

impl Block {
    fn is_empty(&self) -> bool {
        self.prompt.is_none() && self.answer.is_none() && self.context.is_none()
    }

    fn finish(self) -> Exchange {
        Exchange {
            prompt: self.prompt.unwrap_or_default(),
            answer: self.answer.unwrap_or_default(),
            context: self.context.unwrap_or_default(),
        }
    }
}

/// Tags may come in any order and a repeated tag overwrites the earlier value.
/// Lines without a known tag are skipped.
fn decode_tagged(content: &str) -> Vec<Exchange> {
    let mut exchanges = Vec::new();
    let mut block = Block::default();

    for line in content.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.trim().is_empty() {
            if !block.is_empty() {
                exchanges.push(std::mem::take(&mut block).finish());
            }
            continue;
        }

        if let Some(value) = tag_value(line, PROMPT_TAG) {
            block.prompt = Some(value);
        } else if let Some(value) = tag_value(line, ANSWER_TAG) {
            block.answer = Some(value);
        } else if let Some(value) = tag_value(line, CONTEXT_TAG) {
            block.context = Some(value);
        } else {
            log::debug!("Skipping untagged conversation line: {:?}", line);
        }
    }

    if !block.is_empty() {
        exchanges.push(block.finish());
    }

    exchanges
}

fn tag_value(line: &str, tag: &str) -> Option<String> {
    let rest = line.strip_prefix(tag)?;
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    Some(unescape(rest))
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn encode_jsonl(exchanges: &[Exchange]) -> StoreResult<String> {
    let mut out = String::new();
    for exchange in exchanges {
        out.push_str(&serde_json::to_string(exchange)?);
        out.push('\n');
    }
    Ok(out)
}

fn decode_jsonl(content: &str) -> StoreResult<Vec<Exchange>> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<Exchange>(line).map_err(StoreError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Exchange> {
        vec![
            Exchange::new("Who wrote Gitanjali?", "Rabindranath Tagore.", "Asked about Gitanjali."),
            Exchange::new(
                "Tell me more",
                "He won the Nobel Prize in 1913.\n\nHe also wrote songs.",
                "Follow-up: Tagore's Nobel, C:\\path kept",
            ),
        ]
    }

    #[test]
    fn tagged_layout_is_three_lines_and_a_blank() {
        let encoded = ConversationFormat::Tagged
            .encode(&[Exchange::new("p", "a", "c")])
            .unwrap();
        assert_eq!(encoded, "PROMPT: p\nANSWER: a\nCONTEXT: c\n\n");
    }

    #[test]
    fn tagged_round_trip_preserves_multi_line_values() {
        let exchanges = sample();
        let encoded = ConversationFormat::Tagged.encode(&exchanges).unwrap();
        let decoded = ConversationFormat::Tagged.decode(&encoded).unwrap();
        assert_eq!(decoded, exchanges);
    }

    #[test]
    fn jsonl_round_trip() {
        let exchanges = sample();
        let encoded = ConversationFormat::Jsonl.encode(&exchanges).unwrap();
        assert_eq!(encoded.lines().count(), 2);
        let decoded = ConversationFormat::Jsonl.decode(&encoded).unwrap();
        assert_eq!(decoded, exchanges);
    }

    #[test]
    fn tagged_decode_accepts_any_tag_order_and_last_write_wins() {
        let content = "CONTEXT: c1\nPROMPT: p1\nANSWER: a1\nPROMPT: p2\n\nANSWER: only\n";
        let decoded = ConversationFormat::Tagged.decode(content).unwrap();
        assert_eq!(
            decoded,
            vec![Exchange::new("p2", "a1", "c1"), Exchange::new("", "only", "")]
        );
    }

    #[test]
    fn tagged_decode_skips_noise_and_extra_blank_lines() {
        let content = "\n\nnot a tag\n\nPROMPT:p\r\nANSWER: a\r\nCONTEXT: c\r\n\n\n";
        let decoded = ConversationFormat::Tagged.decode(content).unwrap();
        assert_eq!(decoded, vec![Exchange::new("p", "a", "c")]);
    }

    #[test]
    fn raw_backslash_n_reads_as_line_break() {
        let content = "PROMPT: C:\\new\\docs\nANSWER: C:\\temp\nCONTEXT: C:\\x\n";
        let decoded = ConversationFormat::Tagged.decode(content).unwrap();
        assert_eq!(
            decoded,
            vec![Exchange::new("C:\new\\docs", "C:\\temp", "C:\\x")]
        );
    }

    #[test]
    fn jsonl_decode_reports_corrupt_lines() {
        assert!(ConversationFormat::Jsonl.decode("{not json}\n").is_err());
    }
}
