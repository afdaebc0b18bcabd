use crate::saved::SavedPersona;

/// Summary row for one saved persona.
pub struct PersonaRow {
    pub id: String,
    pub name: String,
    pub model: String,
    pub created: String,
    pub stale: bool,
}

impl From<&SavedPersona> for PersonaRow {
    fn from(p: &SavedPersona) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            model: p.model.to_string(),
            created: p.created_at.format("%Y-%m-%d %H:%M").to_string(),
            stale: !p.is_current(),
        }
    }
}

pub fn rows(personas: &[SavedPersona]) -> Vec<PersonaRow> {
    personas.iter().map(PersonaRow::from).collect()
}

/// Render rows as an aligned table. Stale rows are marked with `*`.
pub fn format_table(rows: &[PersonaRow]) -> String {
    if rows.is_empty() {
        return "(no personas found)\n".to_string();
    }
    // `{:<w$}` pads by chars, so widths are char counts.
    let width = |s: &str| s.chars().count();
    let w_id = rows.iter().map(|r| width(&r.id) + 1).max().unwrap_or(2).max(2);
    let w_name = rows.iter().map(|r| width(&r.name)).max().unwrap_or(4).max(4);
    let w_model = rows.iter().map(|r| width(&r.model)).max().unwrap_or(5).max(5);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<w_id$}  {:<w_name$}  {:<w_model$}  CREATED\n",
        "ID", "NAME", "MODEL"
    ));
    out.push_str(&format!(
        "{:<w_id$}  {:<w_name$}  {:<w_model$}  ----------------\n",
        "-".repeat(w_id),
        "-".repeat(w_name),
        "-".repeat(w_model)
    ));
    for r in rows {
        let id = if r.stale {
            format!("{}*", r.id)
        } else {
            r.id.clone()
        };
        out.push_str(&format!(
            "{:<w_id$}  {:<w_name$}  {:<w_model$}  {}\n",
            id, r.name, r.model, r.created
        ));
    }
    out
}

pub fn print_table(rows: &[PersonaRow]) {
    print!("{}", format_table(rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BuildAnswers, Field};

    #[test]
    fn empty_table() {
        assert_eq!(format_table(&[]), "(no personas found)\n");
    }

    #[test]
    fn columns_align_and_stale_rows_are_marked() {
        let fresh = SavedPersona::new(BuildAnswers::default().with(Field::Name, "Nova"), Vec::new());
        let mut stale = SavedPersona::new(BuildAnswers::default().with(Field::Name, "Byte"), Vec::new());
        stale.answers.set(Field::Tone, "formal");

        let table = format_table(&rows(&[fresh.clone(), stale.clone()]));
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].starts_with(&fresh.id));
        assert!(!lines[2].starts_with(&format!("{}*", fresh.id)));
        assert!(lines[3].starts_with(&format!("{}*", stale.id)));
        let col = lines[0].find("NAME").unwrap();
        assert_eq!(&lines[2][col..col + 4], "Nova");
    }

    #[test]
    fn non_ascii_names_keep_columns_aligned() {
        let zoe = SavedPersona::new(
            BuildAnswers::default().with(Field::Name, "Zo\u{eb} Ostrowska"),
            Vec::new(),
        );
        let al = SavedPersona::new(BuildAnswers::default().with(Field::Name, "Al"), Vec::new());
        let table = format_table(&rows(&[zoe, al]));
        let lines: Vec<_> = table.lines().collect();
        let char_col = |line: &str, needle: &str| line[..line.find(needle).unwrap()].chars().count();
        let header = char_col(lines[0], "MODEL");
        assert_eq!(char_col(lines[2], "deepseek/"), header);
        assert_eq!(char_col(lines[3], "deepseek/"), header);
    }
}
