//! Matching field values against compiled formats.
//!
//! Values must already use `\n` line breaks (see [`normalize_line_breaks`]).
//! The matcher walks the components in order, trying the longest run first
//! and backtracking when a later component cannot match. Failed
//! `(component, position)` states are memoised, so the walk stays
//! polynomial in the value length.

use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use lc_model::{CompiledFormat, ComponentKind, FormatComponent, Separator};

use crate::charset::{accepts, run_is_valid};

/// Replace `\r\n` (and stray `\r`) with `\n`.
pub fn normalize_line_breaks(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n")
}

/// Successful match: the byte range each component matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatMatch {
    /// One entry per component; `None` for skipped optional groups.
    pub spans: Vec<Option<Range<usize>>>,
}

impl FormatMatch {
    /// Text matched by component `index`, without its separator.
    pub fn segment<'v>(&self, value: &'v str, index: usize) -> Option<&'v str> {
        self.spans
            .get(index)
            .and_then(|span| span.clone())
            .and_then(|span| value.get(span))
    }
}

/// Why a value does not fit its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatMismatch {
    /// Index of the first failing component.
    pub component: usize,
    /// The component's pattern, e.g. `6!n`.
    pub expected: String,
    /// Character offset where matching gave up.
    pub position: usize,
    pub reason: String,
}

impl fmt::Display for FormatMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "component {} ({}) at position {}: {}",
            self.component + 1,
            self.expected,
            self.position,
            self.reason
        )
    }
}

/// Match `value` against `format`.
pub fn match_value(format: &CompiledFormat, value: &str) -> Result<FormatMatch, FormatMismatch> {
    let chars: Vec<char> = value.chars().collect();
    let mut offsets: Vec<usize> = value.char_indices().map(|(i, _)| i).collect();
    offsets.push(value.len());

    if format.components.is_empty() {
        return Err(FormatMismatch {
            component: 0,
            expected: format.spec.clone(),
            position: 0,
            reason: "format has no components".to_string(),
        });
    }

    let mut search = Search {
        components: &format.components,
        chars: &chars,
        failed: HashSet::new(),
        furthest: None,
    };
    let mut spans = vec![None; format.components.len()];
    if search.walk(0, 0, &mut spans) {
        let spans = spans
            .into_iter()
            .map(|span| span.map(|(start, end)| offsets[start]..offsets[end]))
            .collect();
        return Ok(FormatMatch { spans });
    }

    let failure = search.furthest.unwrap_or(Failure {
        component: 0,
        position: 0,
        reason: "value does not match".to_string(),
    });
    Err(FormatMismatch {
        expected: format.components[failure.component].to_string(),
        component: failure.component,
        position: failure.position,
        reason: failure.reason,
    })
}

#[derive(Debug, Clone)]
struct Failure {
    component: usize,
    position: usize,
    reason: String,
}

struct Search<'a> {
    components: &'a [FormatComponent],
    chars: &'a [char],
    failed: HashSet<(usize, usize)>,
    furthest: Option<Failure>,
}

impl Search<'_> {
    fn walk(&mut self, index: usize, pos: usize, spans: &mut [Option<(usize, usize)>]) -> bool {
        if index == self.components.len() {
            if pos == self.chars.len() {
                return true;
            }
            self.fail(index - 1, pos, "unexpected trailing content".to_string());
            return false;
        }
        if self.failed.contains(&(index, pos)) {
            return false;
        }

        let component = &self.components[index];
        let matched = match component.group {
            Some(group) if index == 0 || self.components[index - 1].group != Some(group) => {
                if self.component(index, pos, spans) {
                    true
                } else {
                    let after = self.group_end(index, group);
                    for span in &mut spans[index..after] {
                        *span = None;
                    }
                    self.walk(after, pos, spans)
                }
            }
            _ => self.component(index, pos, spans),
        };

        if !matched {
            self.failed.insert((index, pos));
        }
        matched
    }

    fn group_end(&self, index: usize, group: u16) -> usize {
        let mut end = index;
        while end < self.components.len() && self.components[end].group == Some(group) {
            end += 1;
        }
        end
    }

    fn component(&mut self, index: usize, pos: usize, spans: &mut [Option<(usize, usize)>]) -> bool {
        let start = match self.components[index].separator {
            Separator::None => pos,
            Separator::Slash => {
                if self.chars.get(pos) != Some(&'/') {
                    self.fail(index, pos, "expected '/'".to_string());
                    return false;
                }
                pos + 1
            }
            Separator::Newline if pos == 0 => pos,
            Separator::Newline => {
                if self.chars.get(pos) != Some(&'\n') {
                    self.fail(index, pos, "expected line break".to_string());
                    return false;
                }
                pos + 1
            }
        };

        let ends = self.candidate_ends(index, start);
        for end in ends {
            spans[index] = Some((start, end));
            if self.walk(index + 1, end, spans) {
                return true;
            }
        }
        spans[index] = None;
        false
    }

    /// Possible end positions for a component starting at `start`, longest first.
    fn candidate_ends(&mut self, index: usize, start: usize) -> Vec<usize> {
        let components = self.components;
        let component = &components[index];
        if let Some(reason) = self.line_start_violation(component, start) {
            self.fail(index, start, reason);
            return Vec::new();
        }

        let class = component.char_class;
        let max = usize::from(component.max_len);
        let min = usize::from(component.min_len);
        let run = self.run_length(class, start, max);

        match component.kind {
            ComponentKind::Fixed => {
                let end = start + max;
                if run >= max && run_is_valid(class, &self.chars[start..end]) {
                    vec![end]
                } else {
                    self.fail(index, start + run, describe(component, run));
                    Vec::new()
                }
            }
            ComponentKind::Variable => {
                let ends: Vec<usize> = (min..=run)
                    .rev()
                    .map(|len| start + len)
                    .filter(|end| run_is_valid(class, &self.chars[start..*end]))
                    .collect();
                if ends.is_empty() {
                    self.fail(index, start + run, describe(component, run));
                }
                ends
            }
            ComponentKind::Repeated => self.line_ends(index, start),
        }
    }

    fn line_ends(&mut self, index: usize, start: usize) -> Vec<usize> {
        let components = self.components;
        let component = &components[index];
        let class = component.char_class;
        let width = usize::from(component.max_len);
        let max_lines = usize::from(component.line_count.unwrap_or(1));

        let mut ends = Vec::new();
        let mut line_start = start;
        for line in 0..max_lines {
            if line > 0 {
                if self.chars.get(line_start) != Some(&'\n') {
                    break;
                }
                line_start += 1;
                if let Some(reason) = self.line_start_violation(component, line_start) {
                    self.fail(index, line_start, reason);
                    break;
                }
            }
            let run = self.run_length(class, line_start, width);
            if run == 0 {
                if line == 0 {
                    self.fail(index, line_start, describe(component, run));
                }
                break;
            }
            line_start += run;
            ends.push(line_start);
        }
        ends.reverse();
        ends
    }

    /// Text lines after a line break may not begin with `:` or `-`.
    fn line_start_violation(&self, component: &FormatComponent, start: usize) -> Option<String> {
        if !component.char_class.is_text() || start == 0 {
            return None;
        }
        if self.chars.get(start - 1) != Some(&'\n') {
            return None;
        }
        match self.chars.get(start) {
            Some(c @ (':' | '-')) => Some(format!("line may not start with '{c}'")),
            _ => None,
        }
    }

    fn run_length(&self, class: lc_model::CharClass, start: usize, limit: usize) -> usize {
        self.chars
            .get(start..)
            .unwrap_or(&[])
            .iter()
            .take(limit)
            .take_while(|c| accepts(class, **c))
            .count()
    }

    fn fail(&mut self, component: usize, position: usize, reason: String) {
        let further = match &self.furthest {
            None => true,
            Some(best) => {
                position > best.position
                    || (position == best.position && component > best.component)
            }
        };
        if further {
            self.furthest = Some(Failure {
                component,
                position,
                reason,
            });
        }
    }
}

fn describe(component: &FormatComponent, run: usize) -> String {
    let class = component.char_class;
    match component.kind {
        ComponentKind::Fixed if run >= usize::from(component.max_len) => {
            format!("'{}' content is not a valid {class} value", component.pattern())
        }
        ComponentKind::Fixed => format!(
            "expected exactly {} {class} characters, found {run}",
            component.max_len
        ),
        ComponentKind::Variable if run > 0 => {
            format!("content is not a valid {class} value")
        }
        ComponentKind::Variable => format!(
            "expected 1 to {} {class} characters, found none",
            component.max_len
        ),
        ComponentKind::Repeated => format!(
            "expected up to {} lines of 1 to {} {class} characters",
            component.line_count.unwrap_or(1),
            component.max_len
        ),
    }
}
