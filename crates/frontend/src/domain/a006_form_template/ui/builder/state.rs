//! Edit operations of the template builder, applied to the DTO under edit.

use contracts::domain::a006_form_template::{FieldKind, FormField, FormSection, FormTemplateDto};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

fn shift<T>(items: &mut [T], index: usize, direction: Direction) {
    let target = match direction {
        Direction::Up if index > 0 => index - 1,
        Direction::Down if index + 1 < items.len() => index + 1,
        _ => return,
    };
    items.swap(index, target);
}

pub fn blank_template() -> FormTemplateDto {
    FormTemplateDto {
        sections: vec![FormSection::new("General")],
        ..Default::default()
    }
}

pub fn add_section(dto: &mut FormTemplateDto) -> String {
    let section = FormSection::new(format!("Section {}", dto.sections.len() + 1));
    let id = section.id.clone();
    dto.sections.push(section);
    id
}

pub fn remove_section(dto: &mut FormTemplateDto, section_id: &str) {
    dto.sections.retain(|s| s.id != section_id);
}

pub fn rename_section(dto: &mut FormTemplateDto, section_id: &str, title: String) {
    if let Some(s) = dto.sections.iter_mut().find(|s| s.id == section_id) {
        s.title = title;
    }
}

pub fn move_section(dto: &mut FormTemplateDto, section_id: &str, direction: Direction) {
    if let Some(i) = dto.sections.iter().position(|s| s.id == section_id) {
        shift(&mut dto.sections, i, direction);
    }
}

/// Append a field of the given type name; None when the type is unknown
pub fn add_field(dto: &mut FormTemplateDto, section_id: &str, type_name: &str) -> Option<String> {
    let kind = FieldKind::from_type_name(type_name)?;
    let section = dto.sections.iter_mut().find(|s| s.id == section_id)?;
    let field = FormField::new(kind.label(), kind);
    let id = field.id.clone();
    section.fields.push(field);
    Some(id)
}

pub fn remove_field(dto: &mut FormTemplateDto, field_id: &str) {
    for section in &mut dto.sections {
        section.fields.retain(|f| f.id != field_id);
    }
}

pub fn update_field(dto: &mut FormTemplateDto, field_id: &str, f: impl FnOnce(&mut FormField)) {
    if let Some(field) = dto
        .sections
        .iter_mut()
        .flat_map(|s| s.fields.iter_mut())
        .find(|field| field.id == field_id)
    {
        f(field);
    }
}

pub fn move_field(dto: &mut FormTemplateDto, field_id: &str, direction: Direction) {
    for section in &mut dto.sections {
        if let Some(i) = section.fields.iter().position(|f| f.id == field_id) {
            shift(&mut section.fields, i, direction);
            return;
        }
    }
}

/// Change a field's type, keeping the settings when the type is unchanged
pub fn change_field_type(dto: &mut FormTemplateDto, field_id: &str, type_name: &str) {
    let Some(kind) = FieldKind::from_type_name(type_name) else {
        return;
    };
    update_field(dto, field_id, |field| {
        if field.kind.type_name() != type_name {
            field.kind = kind;
        }
    });
}

/// Options of a select field, one per line in the editor
pub fn parse_options(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_template_from_scratch() {
        let mut dto = blank_template();
        dto.name = "Hot work permit".into();
        assert!(dto.validate().is_err());

        let section = dto.sections[0].id.clone();
        let field = add_field(&mut dto, &section, "select").unwrap();
        assert!(dto.validate().is_err());

        update_field(&mut dto, &field, |f| {
            f.kind = FieldKind::Select {
                options: parse_options("Yes\n\n No \n"),
            };
            f.required = true;
        });
        assert!(dto.validate().is_ok());
        assert_eq!(
            dto.sections[0].fields[0].kind,
            FieldKind::Select {
                options: vec!["Yes".into(), "No".into()]
            }
        );
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let mut dto = blank_template();
        let section = dto.sections[0].id.clone();
        assert!(add_field(&mut dto, &section, "video").is_none());
        assert!(add_field(&mut dto, "missing", "text").is_none());
    }

    #[test]
    fn test_move_and_remove() {
        let mut dto = blank_template();
        let s1 = dto.sections[0].id.clone();
        let s2 = add_section(&mut dto);
        move_section(&mut dto, &s2, Direction::Up);
        assert_eq!(dto.sections[0].id, s2);
        move_section(&mut dto, &s2, Direction::Up);
        assert_eq!(dto.sections[0].id, s2);

        let a = add_field(&mut dto, &s1, "text").unwrap();
        let b = add_field(&mut dto, &s1, "date").unwrap();
        move_field(&mut dto, &b, Direction::Up);
        assert_eq!(dto.sections[1].fields[0].id, b);
        remove_field(&mut dto, &a);
        assert_eq!(dto.sections[1].fields.len(), 1);

        remove_section(&mut dto, &s1);
        assert_eq!(dto.sections.len(), 1);
    }

    #[test]
    fn test_change_type_keeps_same_kind_settings() {
        let mut dto = blank_template();
        let section = dto.sections[0].id.clone();
        let f = add_field(&mut dto, &section, "number").unwrap();
        update_field(&mut dto, &f, |field| {
            field.kind = FieldKind::Number {
                min: Some(0.0),
                max: Some(10.0),
            }
        });
        change_field_type(&mut dto, &f, "number");
        assert_eq!(
            dto.sections[0].fields[0].kind,
            FieldKind::Number {
                min: Some(0.0),
                max: Some(10.0)
            }
        );
        change_field_type(&mut dto, &f, "checkbox");
        assert_eq!(dto.sections[0].fields[0].kind, FieldKind::Checkbox);
    }
}
