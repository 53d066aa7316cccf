//! Compatibility rule catalog. One file per rule; `registry()` builds the
//! boxed list in registration order.

mod box_sizing;
mod disable_scroll;
mod display_inline;
mod no_calc;
mod position_fixed;
mod renderer_skyline;
mod scroll_view;

use crate::engine::Rule;

/// Build the full registry, minus any rule named in `skip`.
/// Registration order groups rules by grammar; it does not affect
/// correctness, since rules are independent.
pub fn registry(skip: &[String]) -> Vec<Box<dyn Rule>> {
    let all: Vec<Box<dyn Rule>> = vec![
        // markup
        Box::new(scroll_view::ScrollView),
        // style
        Box::new(box_sizing::BoxSizing),
        Box::new(display_inline::DisplayInline),
        Box::new(no_calc::NoCalc::new()),
        Box::new(position_fixed::PositionFixed),
        // config
        Box::new(disable_scroll::DisableScroll),
        Box::new(renderer_skyline::RendererSkyline),
    ];
    all.into_iter()
        .filter(|rule| !skip.iter().any(|name| name == rule.meta().name))
        .collect()
}

#[cfg(test)]
pub(crate) fn run_rule<R: Rule + 'static>(
    rule: R,
    grammar: crate::document::Grammar,
    text: &str,
) -> crate::engine::FileAnalysis {
    let doc = crate::document::Document::parse(
        grammar,
        std::path::Path::new("fixture.src"),
        text.to_string(),
    )
    .expect("fixture parses");
    crate::engine::run(&[Box::new(rule)], &doc)
}

#[cfg(test)]
mod tests {
    use super::registry;

    #[test]
    fn skip_list_filters_by_name() {
        let full = registry(&[]).len();
        let trimmed = registry(&["no-calc".to_string()]);
        assert_eq!(trimmed.len(), full - 1);
        assert!(trimmed.iter().all(|r| r.meta().name != "no-calc"));
    }
}
