pub const ASSISTANT_NAME: &str = "Painting Description Assistant";
pub const ASSISTANT_INSTRUCTIONS: &str = include_str!("../data/prompts/assistant_instructions.txt");
pub const DESCRIPTION_USER: &str = include_str!("../data/prompts/description_user.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.trim_end().to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
