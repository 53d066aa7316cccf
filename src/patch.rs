//! Patch merging: compose independent edits into one rewrite of the
//! original text, or reject the merge on conflict.

use crate::error::Error;
use crate::types::Edit;

/// Apply a set of edits to `original`, producing the rewritten text.
///
/// Edits are ordered by start offset; untouched spans are copied verbatim.
/// Conflict policy: the merge is **rejected** when two edits overlap or
/// share a start offset (which would make insertion order ambiguous).
/// Silently applying both sides would corrupt the output, so the error
/// names both contributing rules and the overlapping span instead.
///
/// # Errors
///
/// Returns `Error::ConflictingEdits` on overlap, or
/// `Error::EditOutOfBounds` when a span leaves the text or splits a UTF-8
/// boundary.
pub fn apply(original: &str, edits: &[Edit]) -> Result<String, Error> {
    if edits.is_empty() {
        return Ok(original.to_string());
    }

    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|e| return (e.start, e.end));

    let mut patched = String::with_capacity(original.len());
    let mut consumed = 0_usize;
    let mut previous: Option<&Edit> = None;

    for edit in ordered {
        if let Some(prev) = previous
            && (edit.start < prev.end || edit.start == prev.start)
        {
            return Err(Error::ConflictingEdits {
                end: prev.end.min(edit.end),
                first_rule: prev.rule.to_string(),
                second_rule: edit.rule.to_string(),
                start: edit.start,
            });
        }

        let untouched = original
            .get(consumed..edit.start)
            .ok_or_else(|| return out_of_bounds(edit, original.len()))?;
        patched.push_str(untouched);

        if original.get(edit.start..edit.end).is_none() {
            return Err(out_of_bounds(edit, original.len()));
        }
        patched.push_str(&edit.replacement);

        consumed = edit.end;
        previous = Some(edit);
    }

    patched.push_str(original.get(consumed..).unwrap_or(""));
    return Ok(patched);
}

fn out_of_bounds(edit: &Edit, len: usize) -> Error {
    return Error::EditOutOfBounds {
        end: edit.end,
        len,
        rule: edit.rule.to_string(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(start: usize, end: usize, replacement: &str, rule: &'static str) -> Edit {
        Edit {
            end,
            replacement: replacement.to_string(),
            rule,
            start,
        }
    }

    #[test]
    fn empty_edit_set_is_identity() {
        assert_eq!(apply("hello world", &[]).unwrap(), "hello world");
    }

    #[test]
    fn applying_empty_twice_is_idempotent() {
        let once = apply("hello", &[]).unwrap();
        assert_eq!(apply(&once, &[]).unwrap(), "hello");
    }

    #[test]
    fn single_replacement() {
        let patched = apply("position: fixed;", &[edit(10, 15, "absolute", "r")]).unwrap();
        assert_eq!(patched, "position: absolute;");
    }

    #[test]
    fn pure_insertion() {
        let patched = apply("{}", &[edit(1, 1, "\"a\": 1", "r")]).unwrap();
        assert_eq!(patched, "{\"a\": 1}");
    }

    #[test]
    fn disjoint_edits_preserve_length_arithmetic() {
        let original = "0123456789";
        let edits = vec![edit(0, 2, "xxxx", "a"), edit(5, 6, "", "b"), edit(8, 8, "y", "c")];
        let patched = apply(original, &edits).unwrap();

        let removed: usize = edits.iter().map(|e| e.end - e.start).sum();
        let added: usize = edits.iter().map(|e| e.replacement.len()).sum();
        assert_eq!(patched.len(), original.len() - removed + added);
        assert_eq!(patched, "xxxx23467y89");
    }

    #[test]
    fn adjacent_edits_are_compatible() {
        let patched = apply("abcdef", &[edit(0, 3, "X", "a"), edit(3, 6, "Y", "b")]).unwrap();
        assert_eq!(patched, "XY");
    }

    #[test]
    fn unordered_input_is_sorted_before_application() {
        let patched = apply("abcdef", &[edit(4, 6, "Z", "b"), edit(0, 2, "X", "a")]).unwrap();
        assert_eq!(patched, "XcdZ");
    }

    #[test]
    fn overlapping_edits_are_rejected_naming_both_rules() {
        let text = "x".repeat(30);
        let result = apply(&text, &[edit(10, 20, "A", "first"), edit(15, 25, "B", "second")]);

        let Err(Error::ConflictingEdits { first_rule, second_rule, start, end }) = result else {
            panic!("expected ConflictingEdits");
        };
        assert_eq!(first_rule, "first");
        assert_eq!(second_rule, "second");
        assert_eq!(start, 15);
        assert_eq!(end, 20);
    }

    #[test]
    fn coincident_insertions_are_rejected() {
        let result = apply("abc", &[edit(1, 1, "X", "a"), edit(1, 1, "Y", "b")]);
        assert!(matches!(result, Err(Error::ConflictingEdits { .. })));
    }

    #[test]
    fn out_of_bounds_edit_is_rejected() {
        let result = apply("abc", &[edit(1, 9, "X", "a")]);
        assert!(matches!(result, Err(Error::EditOutOfBounds { .. })));
    }
}
