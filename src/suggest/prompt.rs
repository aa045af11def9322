/// Build the single-turn prompt asking the model for a task breakdown.
pub fn build_prompt(description: &str) -> String {
    format!(
        concat!(
            "Analyze this task: \"{description}\". Provide JSON with:\n",
            "- title (short string)\n",
            "- subtasks (array of 3-5 strings)\n",
            "- priority (low/medium/high)\n",
            "- time_estimate (number of days) as string\n",
            "Example: {{\"title\": \"Project Setup\", \"subtasks\": [\"Install dependencies\", ",
            "\"Configure CI/CD\"], \"priority\": \"high\", \"time_estimate\": \"2\"}}\n",
            "Return ONLY valid JSON:",
        ),
        description = description.trim()
    )
}
