// Code Prompts
// Feature implementation prompt built around a block of source text

pub const CODE_PROMPT_HEADER: &str = "Given the below code, requirement and general rule:\n\n";

pub const CODE_PROMPT_REQUIREMENT: &str = r#"<requirement>
Help me <do stuff, add more explanation and constraint>.
</requirement>
"#;

pub const CODE_PROMPT_GENERAL_RULE: &str = r#"<general_rule>
As a lead developer of the project, you will start with high level ideas on how you would implement this, considering all security and performance issues with it.
Think for as much as you want. Then, for now and the rest of this session:

- Only output code AFTER I have reviewed the strategy. You may realize that you need some file to know more about the system implementation, so feel free to ask me for it.
- Make sure you output professional-grade, production-ready code that is clean, optimized, maintainable and follow best practices.
- Print the code addition or change in 'diff' format (meaning they have the filename, the lines that got changed, and ignore the parts that is unchanged).
- The change must be compatible to be used in the 'patch' program to apply the changes. Follow the line numbers correctly, especially the starting line of the change.
- If printing out 'diff' file, then do not print out any other code block.
</general_rule>"#;

/// Wrap `code` (typically `git ls-files` output or file contents) in the
/// implementation prompt.
pub fn render_code_prompt(code: &str) -> String {
    let mut block = code.to_string();
    if !block.is_empty() && !block.ends_with('\n') {
        block.push('\n');
    }

    format!(
        "{CODE_PROMPT_HEADER}<code>\n{block}</code>\n\n{CODE_PROMPT_REQUIREMENT}\n{CODE_PROMPT_GENERAL_RULE}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_code_between_tags() {
        let prompt = render_code_prompt("src/main.rs\nsrc/lib.rs");

        assert!(prompt.starts_with("Given the below code"));
        assert!(prompt.contains("<code>\nsrc/main.rs\nsrc/lib.rs\n</code>"));
        assert!(prompt.contains("<requirement>"));
        assert!(prompt.ends_with("</general_rule>"));
    }

    #[test]
    fn empty_code_keeps_tags_adjacent() {
        let prompt = render_code_prompt("");
        assert!(prompt.contains("<code>\n</code>"));
    }
}
