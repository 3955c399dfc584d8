// PR Prompts
// Pull request description prompt built around a git diff

pub const PR_PROMPT_HEADER: &str = "Help me generate PR description for the below git diff:\n";

pub const PR_PROMPT_FORMAT: &str = r#"Note that the format of the PR should follow this one:```
## Description
This Pull Request introduces several key functionalities aimed at enhancing the user authentication and verification process in the Control Center. Specifically, it allows users to sign up using email and password, restricts access until SMS verification is completed, and sets up a webhook to handle inbound SMS verification messages. Additionally, it provides users with the ability to confirm the submission of their verification SMS.

## Summary of Changes
1. **Email and Password Signup for Control Center**:
   - Configured necessary settings in `settings.py` for handling signups.
   - Updated the signup template to include terms of use and privacy policy agreements.

2. **Restrict Access Until SMS Verification**:
   - Implemented middleware to redirect users to the verification instruction page if they are not verified.
   - Created views and templates for displaying SMS verification instructions.

3. **Additional Updates**:
   - Added tests for new models, views, and middleware to ensure robust functionality.
   - Updated styling and templates to improve user experience during the signup and verification process.

## Related Stories

- [429 - As a user, I can sign up for Control Center using email and password](https://www.pivotaltracker.com/story/show/187954429)
- [451 - Restrict CC access until SMS verification is completed](https://www.pivotaltracker.com/story/show/187975451)
```"#;

/// Wrap a unified diff in the PR description prompt.
///
/// `branch` is mentioned ahead of the diff when known.
pub fn render_pr_prompt(diff: &str, branch: Option<&str>) -> String {
    let mut prompt = String::from(PR_PROMPT_HEADER);
    if let Some(branch) = branch.filter(|name| !name.is_empty()) {
        prompt.push_str(&format!("(branch: {branch})\n"));
    }
    prompt.push_str("<diff>\n");
    prompt.push_str(diff);
    if !diff.is_empty() && !diff.ends_with('\n') {
        prompt.push('\n');
    }
    prompt.push_str("</diff>\n\n");
    prompt.push_str(PR_PROMPT_FORMAT);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_is_wrapped_and_followed_by_format() {
        let diff = "diff --git a/a.rs b/a.rs\n+fn a() {}\n";
        let prompt = render_pr_prompt(diff, None);

        assert!(prompt.starts_with(PR_PROMPT_HEADER));
        assert!(prompt.contains("<diff>\ndiff --git a/a.rs b/a.rs\n+fn a() {}\n</diff>"));
        assert!(prompt.contains("## Summary of Changes"));
        assert!(!prompt.contains("(branch:"));
    }

    #[test]
    fn branch_is_mentioned_when_known() {
        let prompt = render_pr_prompt("", Some("feature/signup"));
        assert!(prompt.contains("(branch: feature/signup)\n<diff>\n</diff>"));
    }
}
