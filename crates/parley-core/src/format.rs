//! Message formatter: raw text to structured blocks.
//!
//! Assistant text passes through a fixed pipeline, each stage consuming the
//! previous stage's output:
//!
//! 1. fenced code blocks (interiors become opaque to every later stage)
//! 2. inline code
//! 3. bold (before italic, so `**` is never read as two italic markers)
//! 4. italic
//! 5. bullet lists
//! 6. numbered lists
//! 7. paragraph splitting on blank lines
//!
//! This is deliberately not CommonMark: only this construct set is
//! interpreted, and anything malformed (an unterminated fence or emphasis
//! marker) stays in the output as literal text. User text is never
//! interpreted at all.
//!
//! One ordering nuance: list claiming is line-based and runs before the
//! inline stages, so a code span whose newline lands on a `- ` or `1. `
//! line does not protect that line; the list marker wins and the span's
//! halves are left literal.

use parley_types::{Block, Emphasis, InlineRun};

/// Renders raw message text into blocks.
///
/// `is_user` text is wrapped as a single plain paragraph with no markup
/// interpretation. Whitespace-only input produces no blocks at all, which
/// keeps the "no empty block" invariant.
pub fn render(raw_text: &str, is_user: bool) -> Vec<Block> {
    if is_user {
        if raw_text.trim().is_empty() {
            return Vec::new();
        }
        return vec![Block::Paragraph(vec![InlineRun::plain(raw_text)])];
    }

    let mut blocks = Vec::new();
    for segment in split_fences(raw_text) {
        match segment {
            Segment::Code(code) => blocks.push(Block::CodeBlock(code)),
            Segment::Text(text) => render_text(text, &mut blocks),
        }
    }
    blocks
}

/// A top-level slice of the input: fenced code, or text for later stages.
enum Segment<'a> {
    Text(&'a str),
    Code(String),
}

const FENCE: &str = "```";

/// Splits out fenced code regions.
///
/// Interiors are kept verbatim apart from the newlines hugging the fence
/// markers. An opening fence with no closing partner is literal text. A
/// fence pair around nothing but newlines yields no block.
fn split_fences(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let Some(close) = after_open.find(FENCE) else {
            break;
        };
        if open > 0 {
            segments.push(Segment::Text(&rest[..open]));
        }
        let interior = after_open[..close].trim_matches('\n');
        if !interior.is_empty() {
            segments.push(Segment::Code(interior.to_string()));
        }
        rest = &after_open[close + FENCE.len()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    segments
}

/// Runs the list and paragraph stages over one non-code text segment.
fn render_text(text: &str, blocks: &mut Vec<Block>) {
    let mut paragraph: Vec<&str> = Vec::new();
    let mut bullets: Vec<String> = Vec::new();
    let mut numbers: Vec<String> = Vec::new();

    let flush_paragraph = |lines: &mut Vec<&str>, blocks: &mut Vec<Block>| {
        if lines.is_empty() {
            return;
        }
        let joined = lines.join("\n");
        lines.clear();
        if !joined.trim().is_empty() {
            blocks.push(Block::Paragraph(parse_inline(&joined)));
        }
    };
    let flush_bullets = |items: &mut Vec<String>, blocks: &mut Vec<Block>| {
        if !items.is_empty() {
            blocks.push(Block::BulletList(std::mem::take(items)));
        }
    };
    let flush_numbers = |items: &mut Vec<String>, blocks: &mut Vec<Block>| {
        if !items.is_empty() {
            blocks.push(Block::NumberedList(std::mem::take(items)));
        }
    };

    for line in text.lines() {
        // A bullet-claimed line is never reconsidered as a numbered item.
        if let Some(item) = line.strip_prefix("- ") {
            flush_paragraph(&mut paragraph, blocks);
            flush_numbers(&mut numbers, blocks);
            bullets.push(flatten_inline(item));
        } else if let Some(item) = numbered_item(line) {
            flush_paragraph(&mut paragraph, blocks);
            flush_bullets(&mut bullets, blocks);
            numbers.push(flatten_inline(item));
        } else if line.trim().is_empty() {
            flush_paragraph(&mut paragraph, blocks);
            flush_bullets(&mut bullets, blocks);
            flush_numbers(&mut numbers, blocks);
        } else {
            flush_bullets(&mut bullets, blocks);
            flush_numbers(&mut numbers, blocks);
            paragraph.push(line);
        }
    }

    flush_paragraph(&mut paragraph, blocks);
    flush_bullets(&mut bullets, blocks);
    flush_numbers(&mut numbers, blocks);
}

/// Matches a `digits. ` line prefix and returns the item text.
fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

/// Runs the inline stages in their fixed order over one paragraph's text.
pub fn parse_inline(text: &str) -> Vec<InlineRun> {
    let runs = vec![InlineRun::plain(text)];
    let runs = apply_span_rule(runs, "`", Emphasis::Code, true);
    let runs = apply_span_rule(runs, "**", Emphasis::Bold, false);
    apply_span_rule(runs, "*", Emphasis::Italic, false)
}

/// List item text: markers are resolved and the runs flattened back to
/// plain text, so stage ordering stays observable for items too.
fn flatten_inline(text: &str) -> String {
    parse_inline(text).into_iter().map(|run| run.text).collect()
}

/// Applies one delimiter rule to every still-plain run.
///
/// Runs claimed by an earlier stage pass through untouched. Emphasis
/// spans do not cross line breaks; code spans may.
fn apply_span_rule(
    runs: Vec<InlineRun>,
    marker: &str,
    emphasis: Emphasis,
    span_newlines: bool,
) -> Vec<InlineRun> {
    let mut out = Vec::with_capacity(runs.len());
    for run in runs {
        if run.emphasis == Emphasis::None {
            split_spans(&run.text, marker, emphasis, span_newlines, &mut out);
        } else {
            out.push(run);
        }
    }
    out
}

/// Splits one plain text into plain and emphasised runs.
///
/// An opening marker with no closing partner, or with an empty interior,
/// is left as literal text.
fn split_spans(
    text: &str,
    marker: &str,
    emphasis: Emphasis,
    span_newlines: bool,
    out: &mut Vec<InlineRun>,
) {
    let mut plain_start = 0;
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(marker) {
        let open = cursor + found;
        let interior_start = open + marker.len();
        let Some(found_close) = text[interior_start..].find(marker) else {
            break;
        };
        let close = interior_start + found_close;
        let interior = &text[interior_start..close];
        if interior.is_empty() || (!span_newlines && interior.contains('\n')) {
            cursor = interior_start;
            continue;
        }
        if open > plain_start {
            out.push(InlineRun::plain(&text[plain_start..open]));
        }
        out.push(InlineRun::new(interior, emphasis));
        cursor = close + marker.len();
        plain_start = cursor;
    }

    if plain_start < text.len() {
        out.push(InlineRun::plain(&text[plain_start..]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(blocks: &[Block], index: usize) -> &[InlineRun] {
        match &blocks[index] {
            Block::Paragraph(runs) => runs,
            other => panic!("expected paragraph at {index}, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_text_round_trips_to_single_run() {
        let blocks = render("Just plain text without any markup", false);
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![InlineRun::plain(
                "Just plain text without any markup"
            )])]
        );
    }

    #[test]
    fn test_user_text_is_never_interpreted() {
        let blocks = render("**not bold** and `not code`", true);
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![InlineRun::plain(
                "**not bold** and `not code`"
            )])]
        );
    }

    #[test]
    fn test_whitespace_only_input_yields_no_blocks() {
        assert!(render("   \n\n  ", false).is_empty());
        assert!(render("   ", true).is_empty());
    }

    #[test]
    fn test_fence_interior_is_protected_from_later_stages() {
        let blocks = render("```\n**bold** and - item\n1. numbered\n```", false);
        assert_eq!(
            blocks,
            vec![Block::CodeBlock(
                "**bold** and - item\n1. numbered".to_string()
            )]
        );
    }

    #[test]
    fn test_unterminated_fence_is_literal() {
        let blocks = render("```\nno closing fence", false);
        assert_eq!(
            paragraph(&blocks, 0),
            &[InlineRun::plain("```\nno closing fence")]
        );
    }

    #[test]
    fn test_inline_code() {
        let blocks = render("Use `code` here", false);
        assert_eq!(
            paragraph(&blocks, 0),
            &[
                InlineRun::plain("Use "),
                InlineRun::new("code", Emphasis::Code),
                InlineRun::plain(" here"),
            ]
        );
    }

    #[test]
    fn test_bold_before_italic() {
        let blocks = render("**bold** and *italic*", false);
        assert_eq!(
            paragraph(&blocks, 0),
            &[
                InlineRun::new("bold", Emphasis::Bold),
                InlineRun::plain(" and "),
                InlineRun::new("italic", Emphasis::Italic),
            ]
        );
    }

    #[test]
    fn test_unterminated_bold_stays_literal() {
        let blocks = render("**bold with no close", false);
        assert_eq!(
            paragraph(&blocks, 0),
            &[InlineRun::plain("**bold with no close")]
        );
    }

    #[test]
    fn test_code_span_claims_markers_inside_it() {
        let blocks = render("`a ** b`", false);
        assert_eq!(
            paragraph(&blocks, 0),
            &[InlineRun::new("a ** b", Emphasis::Code)]
        );
    }

    #[test]
    fn test_consecutive_bullets_collapse_into_one_list() {
        let blocks = render("- one\n- two\n- three", false);
        assert_eq!(
            blocks,
            vec![Block::BulletList(vec![
                "one".to_string(),
                "two".to_string(),
                "three".to_string(),
            ])]
        );
    }

    #[test]
    fn test_blank_line_separates_lists() {
        let blocks = render("- one\n\n- two", false);
        assert_eq!(
            blocks,
            vec![
                Block::BulletList(vec!["one".to_string()]),
                Block::BulletList(vec!["two".to_string()]),
            ]
        );
    }

    #[test]
    fn test_numbered_list() {
        let blocks = render("1. first\n2. second\n10. tenth", false);
        assert_eq!(
            blocks,
            vec![Block::NumberedList(vec![
                "first".to_string(),
                "second".to_string(),
                "tenth".to_string(),
            ])]
        );
    }

    #[test]
    fn test_bullet_line_is_not_reconsidered_as_numbered() {
        // A "- 1. x" line is claimed by the bullet stage with the number
        // kept as item text.
        let blocks = render("- 1. mixed", false);
        assert_eq!(blocks, vec![Block::BulletList(vec!["1. mixed".to_string()])]);
    }

    #[test]
    fn test_list_items_resolve_inline_markers() {
        let blocks = render("- **bold** item\n- `code` item", false);
        assert_eq!(
            blocks,
            vec![Block::BulletList(vec![
                "bold item".to_string(),
                "code item".to_string(),
            ])]
        );
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let blocks = render("first paragraph\n\nsecond paragraph\n\n   \n\nthird", false);
        assert_eq!(blocks.len(), 3);
        assert_eq!(paragraph(&blocks, 0)[0].text, "first paragraph");
        assert_eq!(paragraph(&blocks, 1)[0].text, "second paragraph");
        assert_eq!(paragraph(&blocks, 2)[0].text, "third");
    }

    #[test]
    fn test_single_newline_stays_inside_paragraph() {
        let blocks = render("line one\nline two", false);
        assert_eq!(blocks.len(), 1);
        assert_eq!(paragraph(&blocks, 0)[0].text, "line one\nline two");
    }

    #[test]
    fn test_list_marker_line_is_not_protected_by_code_span() {
        // Line classification precedes the inline stages: the bullet
        // claims its line, and the orphaned backticks stay literal.
        let blocks = render("`a\n- b`", false);
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![InlineRun::plain("`a")]),
                Block::BulletList(vec!["b`".to_string()]),
            ]
        );
    }

    #[test]
    fn test_emphasis_does_not_span_lines() {
        let blocks = render("**open\nclose**", false);
        assert_eq!(paragraph(&blocks, 0), &[InlineRun::plain("**open\nclose**")]);
    }

    #[test]
    fn test_mixed_prose_and_code_block() {
        // End-to-end: prose with bold, then a fenced block.
        let blocks = render("Hello **world**, see:\n```\nx=1\n```", false);
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![
                    InlineRun::plain("Hello "),
                    InlineRun::new("world", Emphasis::Bold),
                    InlineRun::plain(", see:"),
                ]),
                Block::CodeBlock("x=1".to_string()),
            ]
        );
    }

    #[test]
    fn test_text_after_closing_fence_is_processed() {
        let blocks = render("```\ncode\n```\nAnd **after**.", false);
        assert_eq!(blocks[0], Block::CodeBlock("code".to_string()));
        assert_eq!(
            paragraph(&blocks, 1),
            &[
                InlineRun::plain("And "),
                InlineRun::new("after", Emphasis::Bold),
                InlineRun::plain("."),
            ]
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let input = "para\n\n- a\n- b\n\n1. c\n\n`d` **e** *f*";
        assert_eq!(render(input, false), render(input, false));
    }
}
