//! Environment id derivation for preview environments

/// Maximum length of a Humanitec environment id
pub const ENV_ID_LIMIT: usize = 20;

/// Prefix used for every preview environment id
pub const ENV_ID_PREFIX: &str = "dev";

/// Derive a preview environment id from a branch name
/// Format: {prefix}-{sanitized-branch-tail}
pub fn branch_name_to_env_id(prefix: &str, branch_name: &str) -> String {
    branch_name_to_env_id_with_limit(prefix, branch_name, ENV_ID_LIMIT)
}

/// Same as [`branch_name_to_env_id`] with an explicit length limit.
///
/// The tail of the branch name is kept rather than the head, since branches
/// commonly share prefixes like `feature/` or `dependabot/`. When the prefix
/// leaves no room for a suffix the result is `{prefix}-`.
pub fn branch_name_to_env_id_with_limit(prefix: &str, branch_name: &str, limit: usize) -> String {
    let cleaned = sanitize_branch_name(branch_name);

    let budget = limit.saturating_sub(prefix.chars().count() + 1);

    // cleaned is pure ASCII, so byte offsets are char offsets
    let start = cleaned.len().saturating_sub(budget);
    let suffix = cleaned[start..].trim_start_matches('-');

    format!("{}-{}", prefix, suffix)
}

/// Sanitize a branch name to the env id alphabet
/// - Collapse every run of chars outside [a-z0-9-] into one hyphen
/// - Trim hyphens from start and end
///
/// Uppercase letters are not lowercased, they collapse like any other
/// disallowed char.
fn sanitize_branch_name(branch_name: &str) -> String {
    let mut sanitized = String::with_capacity(branch_name.len());
    let mut in_run = false;

    for c in branch_name.chars() {
        match c {
            'a'..='z' | '0'..='9' | '-' => {
                sanitized.push(c);
                in_run = false;
            }
            _ => {
                if !in_run {
                    sanitized.push('-');
                }
                in_run = true;
            }
        }
    }

    sanitized.trim_matches('-').to_string()
}
