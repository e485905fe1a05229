use crate::models::ChatTurn;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

pub const EXPORT_RULE_WIDTH: usize = 80;
pub const NO_RESPONSE: &str = "No response generated.";

/// Text report of one swarm run, stamped with the current local time.
pub fn format_export_content<I, K, V>(
    task: &str,
    response: &str,
    model: &str,
    metadata: I,
) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Display,
    V: Display,
{
    format_export_content_at(task, response, model, metadata, &Local::now())
}

/// Same report with an explicit generation time. Metadata lines keep the
/// caller's order.
pub fn format_export_content_at<I, K, V, Tz>(
    task: &str,
    response: &str,
    model: &str,
    metadata: I,
    generated: &DateTime<Tz>,
) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Display,
    V: Display,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let rule = "=".repeat(EXPORT_RULE_WIDTH);

    let mut lines = vec![
        rule.clone(),
        "SwarmMaster Export".to_string(),
        rule.clone(),
        format!("Generated: {}", generated.format("%Y-%m-%d %H:%M:%S")),
        format!("Model: {}", model),
    ];

    lines.extend(metadata.into_iter().map(|(k, v)| format!("{}: {}", k, v)));

    lines.extend([
        String::new(),
        rule.clone(),
        "TASK".to_string(),
        rule.clone(),
        task.to_string(),
        String::new(),
        rule.clone(),
        "SWARM RESPONSE".to_string(),
        rule.clone(),
        response.to_string(),
        String::new(),
        rule,
    ]);

    lines.join("\n")
}

/// `filename` if given, otherwise `swarmmaster_export_<YYYYMMDD_HHMMSS>.txt`.
pub fn export_filename(filename: Option<&str>) -> String {
    export_filename_at(filename, &Local::now())
}

pub fn export_filename_at<Tz>(filename: Option<&str>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match filename.filter(|f| !f.trim().is_empty()) {
        Some(name) => name.to_string(),
        None => format!("swarmmaster_export_{}.txt", now.format("%Y%m%d_%H%M%S")),
    }
}

/// Final assistant output in a chat history.
pub fn last_response(history: &[ChatTurn]) -> String {
    history
        .iter()
        .rev()
        .filter_map(|turn| turn.assistant.as_deref())
        .find(|text| !text.is_empty())
        .unwrap_or(NO_RESPONSE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_sections_in_order() {
        let content = format_export_content(
            "Design a viral AI tool",
            "🚀 agents assembled",
            "google/gemma-7b-it",
            Vec::<(String, String)>::new(),
        );

        let task_header = content.find("TASK").unwrap();
        let task = content.find("Design a viral AI tool").unwrap();
        let response_header = content.find("SWARM RESPONSE").unwrap();
        let response = content.find("🚀 agents assembled").unwrap();
        assert!(task_header < task);
        assert!(task < response_header);
        assert!(response_header < response);
    }

    #[test]
    fn test_exact_layout() {
        let rule = "=".repeat(80);
        let content = format_export_content_at(
            "task",
            "answer",
            "model-x",
            [("Temperature", "0.7"), ("Max Tokens", "4096")],
            &fixed_time(),
        );

        let expected = [
            rule.as_str(),
            "SwarmMaster Export",
            rule.as_str(),
            "Generated: 2026-03-14 09:26:53",
            "Model: model-x",
            "Temperature: 0.7",
            "Max Tokens: 4096",
            "",
            rule.as_str(),
            "TASK",
            rule.as_str(),
            "task",
            "",
            rule.as_str(),
            "SWARM RESPONSE",
            rule.as_str(),
            "answer",
            "",
            rule.as_str(),
        ]
        .join("\n");
        assert_eq!(content, expected);
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename_at(None, &fixed_time()),
            "swarmmaster_export_20260314_092653.txt"
        );
        assert_eq!(export_filename_at(Some("mine.txt"), &fixed_time()), "mine.txt");
        assert!(export_filename(None).starts_with("swarmmaster_export_"));
    }

    #[test]
    fn test_last_response() {
        let history = vec![
            ChatTurn {
                user: Some("first".into()),
                assistant: Some("first answer".into()),
            },
            ChatTurn {
                user: Some("second".into()),
                assistant: Some(String::new()),
            },
        ];
        assert_eq!(last_response(&history), "first answer");
        assert_eq!(last_response(&[]), NO_RESPONSE);
    }
}
