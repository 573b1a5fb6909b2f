use serde_json::{json, Value};
use storybase_structure::{Section, StructureType};

pub fn render_sections(sections: &[&Section]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(&format!("{}\t{}\n", section.section_id, one_line(&section.title)));
    }
    out
}

pub fn sections_value(sections: &[&Section]) -> Value {
    Value::Array(
        sections
            .iter()
            .map(|s| json!({ "section_id": s.section_id, "title": s.title }))
            .collect(),
    )
}

pub fn render_nav(previous: Option<&Section>, next: Option<&Section>) -> String {
    let describe = |section: Option<&Section>| match section {
        Some(s) => format!("{}\t{}", s.section_id, one_line(&s.title)),
        None => "-".to_string(),
    };
    format!("previous\t{}\nnext\t{}\n", describe(previous), describe(next))
}

pub fn render_structures(options: &[(&str, &str)], default: StructureType) -> String {
    let mut out = String::new();
    for (id, name) in options {
        let marker = if *id == default.id() { " (default)" } else { "" };
        out.push_str(&format!("{id}\t{name}{marker}\n"));
    }
    out
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
