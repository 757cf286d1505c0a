//! Validated edits to an option list.
//!
//! Each operation takes the current list and returns a new one with `order`
//! renumbered to match position. Nothing is changed if validation fails.

use crate::error::ValidationError;
use crate::models::{renumber, Category, ColorCode, SelectOption};

use super::color::default_color;

fn normalize_label(label: &str) -> Result<String, ValidationError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingLabel);
    }
    Ok(trimmed.to_string())
}

fn finish(mut options: Vec<SelectOption>) -> Vec<SelectOption> {
    renumber(&mut options);
    options
}

/// Append a new option. Without an explicit color the category default is
/// stored, so the entry keeps its color if the rules later change.
pub fn add(
    category: Category,
    options: &[SelectOption],
    label: &str,
    color: Option<ColorCode>,
) -> Result<Vec<SelectOption>, ValidationError> {
    let label = normalize_label(label)?;
    if options.iter().any(|o| o.label == label) {
        return Err(ValidationError::DuplicateLabel(label));
    }

    let color = color.unwrap_or_else(|| default_color(&label, category));
    let mut updated = options.to_vec();
    updated.push(SelectOption::new(label).with_color(color));
    Ok(finish(updated))
}

/// Rename and/or recolor the option at `index`.
pub fn update(
    options: &[SelectOption],
    index: usize,
    label: &str,
    color: Option<ColorCode>,
) -> Result<Vec<SelectOption>, ValidationError> {
    if index >= options.len() {
        return Err(ValidationError::UnknownIndex(index));
    }
    let label = normalize_label(label)?;
    if options.iter().enumerate().any(|(i, o)| i != index && o.label == label) {
        return Err(ValidationError::DuplicateLabel(label));
    }

    let mut updated = options.to_vec();
    let entry = &mut updated[index];
    entry.label = label;
    if color.is_some() {
        entry.color = color;
    }
    Ok(finish(updated))
}

/// Move the option at `from` so it ends up at position `to`.
pub fn move_to(options: &[SelectOption], from: usize, to: usize) -> Result<Vec<SelectOption>, ValidationError> {
    if from >= options.len() {
        return Err(ValidationError::UnknownIndex(from));
    }
    if to >= options.len() {
        return Err(ValidationError::UnknownIndex(to));
    }

    let mut updated = options.to_vec();
    let entry = updated.remove(from);
    updated.insert(to, entry);
    Ok(finish(updated))
}

/// Remove the option labelled `label`.
pub fn delete(
    category: Category,
    options: &[SelectOption],
    label: &str,
) -> Result<Vec<SelectOption>, ValidationError> {
    if category.is_protected(label) {
        return Err(ValidationError::ProtectedEntry(label.to_string()));
    }
    if !options.iter().any(|o| o.label == label) {
        return Err(ValidationError::UnknownLabel(label.to_string()));
    }

    let updated = options.iter().filter(|o| o.label != label).cloned().collect();
    Ok(finish(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::labels;

    fn list(items: &[&str]) -> Vec<SelectOption> {
        finish(items.iter().map(|l| SelectOption::new(*l)).collect())
    }

    fn orders(options: &[SelectOption]) -> Vec<Option<i64>> {
        options.iter().map(|o| o.order).collect()
    }

    #[test]
    fn test_add_trims_and_colors() {
        let updated = add(Category::Statuses, &list(&["Keep"]), "  Done ", None).unwrap();
        assert_eq!(labels(&updated), vec!["Keep", "Done"]);
        assert_eq!(updated[1].color.as_ref().map(ColorCode::as_str), Some("#D1FAE5"));
        assert_eq!(orders(&updated), vec![Some(0), Some(1)]);

        let red: ColorCode = "#FF0000".parse().unwrap();
        let updated = add(Category::Groups, &[], "Tour", Some(red.clone())).unwrap();
        assert_eq!(updated[0].color, Some(red));
    }

    #[test]
    fn test_add_rejects_blank_and_duplicate() {
        let current = list(&["Keep"]);
        assert_eq!(add(Category::Statuses, &current, "   ", None), Err(ValidationError::MissingLabel));
        assert_eq!(
            add(Category::Statuses, &current, " Keep", None),
            Err(ValidationError::DuplicateLabel("Keep".to_string()))
        );
    }

    #[test]
    fn test_update_renames_and_recolors() {
        let current = list(&["Artist A", "Artist B"]);
        let blue: ColorCode = "#0000FF".parse().unwrap();

        let renamed = update(&current, 0, "Artist Z", None).unwrap();
        assert_eq!(labels(&renamed), vec!["Artist Z", "Artist B"]);
        assert_eq!(renamed[0].color, None);

        let recolored = update(&current, 1, "Artist B", Some(blue.clone())).unwrap();
        assert_eq!(recolored[1].color, Some(blue));
    }

    #[test]
    fn test_update_validation() {
        let current = list(&["Artist A", "Artist B"]);
        assert_eq!(update(&current, 2, "x", None), Err(ValidationError::UnknownIndex(2)));
        assert_eq!(
            update(&current, 0, "Artist B", None),
            Err(ValidationError::DuplicateLabel("Artist B".to_string()))
        );
        assert_eq!(update(&current, 0, "", None), Err(ValidationError::MissingLabel));
    }

    #[test]
    fn test_move_to() {
        let current = list(&["a", "b", "c", "d"]);
        let moved = move_to(&current, 3, 0).unwrap();
        assert_eq!(labels(&moved), vec!["d", "a", "b", "c"]);
        assert_eq!(orders(&moved), vec![Some(0), Some(1), Some(2), Some(3)]);

        let moved = move_to(&current, 0, 2).unwrap();
        assert_eq!(labels(&moved), vec!["b", "c", "a", "d"]);
        assert_eq!(move_to(&current, 1, 4), Err(ValidationError::UnknownIndex(4)));
    }

    #[test]
    fn test_delete() {
        let current = list(&["東京", "Seoul", "大阪"]);
        let updated = delete(Category::Areas, &current, "Seoul").unwrap();
        assert_eq!(labels(&updated), vec!["東京", "大阪"]);
        assert_eq!(orders(&updated), vec![Some(0), Some(1)]);

        assert_eq!(
            delete(Category::Areas, &current, "東京"),
            Err(ValidationError::ProtectedEntry("東京".to_string()))
        );
        assert_eq!(
            delete(Category::Areas, &current, "Paris"),
            Err(ValidationError::UnknownLabel("Paris".to_string()))
        );
        // Seeded entries of other categories can go
        let sellers = list(&["ローチケ", "その他"]);
        assert_eq!(labels(&delete(Category::Sellers, &sellers, "その他").unwrap()), vec!["ローチケ"]);
    }
}
