use crate::config::SegmenterConfig;
use crate::error::{Result, SegmenterError};
use crate::tokens::TokenCounter;
use crate::types::Chunk;
use matter_protocol::citations::paragraph_has_citation;
use matter_protocol::tags::extract_statute_tags;
use matter_protocol::{ChunkKind, Paragraph};
use std::collections::BTreeSet;

/// Markers that classify a paragraph as a headnote regardless of position
const HEADNOTE_MARKERS: &[&str] = &["HELD:", "SUMMARY:", "HEADNOTE", "BRIEF:", "GIST:"];

/// Party-role markers that disqualify a leading paragraph from positional
/// headnote classification (cause titles, not summaries)
const PARTY_MARKERS: &[&str] = &["PETITIONER", "RESPONDENT", "APPELLANT"];

/// Turns an ordered paragraph sequence into token-bounded chunks: isolated
/// headnotes, sliding-window content spans with overlap, and additive
/// citation-context windows.
pub struct Segmenter {
    config: SegmenterConfig,
    counter: TokenCounter,
}

impl Segmenter {
    /// Create a segmenter, loading the subword tokenizer when the config
    /// names one.
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        let counter = match &config.tokenizer_path {
            Some(path) => TokenCounter::from_file(path)?,
            None => TokenCounter::Heuristic,
        };
        Self::with_counter(config, counter)
    }

    /// Create a segmenter with an explicit token counter.
    pub fn with_counter(config: SegmenterConfig, counter: TokenCounter) -> Result<Self> {
        config.validate().map_err(SegmenterError::InvalidConfig)?;
        Ok(Self { config, counter })
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segment one authority's paragraphs into chunks.
    ///
    /// Malformed (blank) paragraphs are skipped, never raised. An authority
    /// with no usable paragraphs, or one that yields no chunks, is a
    /// pipeline-terminating error for the caller.
    pub fn segment(&self, authority_id: &str, paragraphs: &[Paragraph]) -> Result<Vec<Chunk>> {
        let usable: Vec<&Paragraph> = paragraphs
            .iter()
            .filter(|p| !p.text.trim().is_empty())
            .collect();

        let skipped = paragraphs.len() - usable.len();
        if skipped > 0 {
            log::debug!("{authority_id}: skipped {skipped} blank paragraphs");
        }

        if usable.is_empty() {
            return Err(SegmenterError::EmptyDocument {
                authority_id: authority_id.to_string(),
            });
        }

        let counts: Vec<usize> = usable.iter().map(|p| self.counter.count(&p.text)).collect();

        let mut headnotes = Vec::new();
        let mut body = Vec::new();
        for (pos, para) in usable.iter().enumerate() {
            if self.is_headnote(pos, para) {
                headnotes.push(pos);
            } else {
                body.push(pos);
            }
        }

        let mut chunks = Vec::new();
        for &pos in &headnotes {
            chunks.push(self.make_chunk(authority_id, &usable[pos..=pos], &counts[pos..=pos], ChunkKind::Headnote));
        }
        chunks.extend(self.window_content(authority_id, &usable, &counts, &body));
        chunks.extend(self.citation_contexts(authority_id, &usable, &counts));

        if chunks.is_empty() {
            return Err(SegmenterError::NoChunks {
                authority_id: authority_id.to_string(),
            });
        }

        log::debug!(
            "{authority_id}: {} chunks from {} paragraphs",
            chunks.len(),
            usable.len()
        );
        Ok(chunks)
    }

    /// A paragraph is a headnote when it carries a summary marker, or when it
    /// is an early, long paragraph that is not a cause title.
    fn is_headnote(&self, position: usize, para: &Paragraph) -> bool {
        let upper = para.text.to_uppercase();
        if HEADNOTE_MARKERS.iter().any(|m| upper.contains(m)) {
            return true;
        }

        position < self.config.headnote_scan_window
            && para.word_count > self.config.headnote_min_words
            && !PARTY_MARKERS.iter().any(|m| upper.contains(m))
    }

    /// Sliding-window chunking over body paragraphs. `body` holds positions
    /// into `usable`/`counts`.
    fn window_content(
        &self,
        authority_id: &str,
        usable: &[&Paragraph],
        counts: &[usize],
        body: &[usize],
    ) -> Vec<Chunk> {
        let max = self.config.max_chunk_tokens;
        let min = self.config.min_chunk_tokens;

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < body.len() {
            let mut end = start;
            let mut tokens = 0usize;
            while end < body.len() {
                let next = counts[body[end]];
                if tokens + next <= max {
                    tokens += next;
                    end += 1;
                } else if tokens < min {
                    // Size floor beats size ceiling: force-include exactly one
                    // more paragraph, then emit.
                    tokens += next;
                    end += 1;
                    break;
                } else {
                    break;
                }
            }
            if end == start {
                // A paragraph larger than the ceiling with the floor already
                // met cannot stall the window.
                tokens += counts[body[end]];
                end += 1;
            }

            let members: Vec<&Paragraph> = body[start..end].iter().map(|&pos| usable[pos]).collect();
            let member_counts: Vec<usize> = body[start..end].iter().map(|&pos| counts[pos]).collect();
            chunks.push(self.make_chunk(authority_id, &members, &member_counts, ChunkKind::Content));

            if end >= body.len() {
                break;
            }

            // Walk backward from the tail, re-including paragraphs while the
            // overlap budget holds; the window must advance at least one
            // paragraph per iteration.
            let budget = (tokens as f32 * self.config.overlap_ratio) as usize;
            let mut next_start = end;
            let mut acc = 0usize;
            for j in (start..end).rev() {
                acc += counts[body[j]];
                if acc > budget {
                    break;
                }
                next_start = j;
            }
            start = next_start.max(start + 1);
        }

        chunks
    }

    /// Additive citation-context windows around every citation-bearing
    /// paragraph, clipped to sequence bounds. Distinct spans only; they never
    /// replace or dedupe against content chunks.
    fn citation_contexts(
        &self,
        authority_id: &str,
        usable: &[&Paragraph],
        counts: &[usize],
    ) -> Vec<Chunk> {
        let radius = self.config.citation_context_radius;
        let mut spans: BTreeSet<(usize, usize)> = BTreeSet::new();
        for (pos, para) in usable.iter().enumerate() {
            if paragraph_has_citation(&para.text) {
                let lo = pos.saturating_sub(radius);
                let hi = (pos + radius).min(usable.len() - 1);
                spans.insert((lo, hi));
            }
        }

        spans
            .into_iter()
            .map(|(lo, hi)| {
                self.make_chunk(
                    authority_id,
                    &usable[lo..=hi],
                    &counts[lo..=hi],
                    ChunkKind::CitationContext,
                )
            })
            .collect()
    }

    fn make_chunk(
        &self,
        authority_id: &str,
        members: &[&Paragraph],
        counts: &[usize],
        kind: ChunkKind,
    ) -> Chunk {
        let text = members
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut statute_tags = BTreeSet::new();
        let mut has_citation = false;
        for para in members {
            statute_tags.extend(extract_statute_tags(&para.text));
            has_citation = has_citation || paragraph_has_citation(&para.text);
        }

        Chunk {
            authority_id: authority_id.to_string(),
            para_from: members.first().map_or(0, |p| p.id),
            para_to: members.last().map_or(0, |p| p.id),
            text,
            token_count: counts.iter().sum(),
            statute_tags,
            has_citation,
            kind,
            paragraph_count: members.len(),
        }
    }
}
