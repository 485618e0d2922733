//! Menu and section visibility
//!
//! Exactly one menu item is active and exactly one section is visible. Items
//! name their section by id, so a mislabelled item is rejected when the menu is
//! built instead of silently showing nothing.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("menu has no items")]
    Empty,

    #[error("menu item {item} points at unknown section {section}")]
    UnknownSection { item: String, section: String },

    #[error("unknown menu item: {0}")]
    UnknownItem(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub section: String,
}

impl MenuItem {
    pub fn new(id: &str, label: &str, section: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            section: section.to_string(),
        }
    }
}

pub const CHAT_SECTION: &str = "chat-section";
pub const TRAMITES_SECTION: &str = "tramites-section";

#[derive(Debug, Clone)]
pub struct MenuController {
    items: Vec<MenuItem>,
    sections: Vec<String>,
    active: usize,
}

impl MenuController {
    /// The first item starts active.
    pub fn new(items: Vec<MenuItem>, sections: Vec<String>) -> Result<Self, MenuError> {
        if items.is_empty() {
            return Err(MenuError::Empty);
        }
        if let Some(item) = items.iter().find(|i| !sections.contains(&i.section)) {
            return Err(MenuError::UnknownSection {
                item: item.id.clone(),
                section: item.section.clone(),
            });
        }

        Ok(Self {
            items,
            sections,
            active: 0,
        })
    }

    /// The portal's own menu: chat assistant and trámites.
    pub fn portal() -> Self {
        Self {
            items: vec![
                MenuItem::new("chat", "Chat Asistente", CHAT_SECTION),
                MenuItem::new("tramites", "Trámites", TRAMITES_SECTION),
            ],
            sections: vec![CHAT_SECTION.to_string(), TRAMITES_SECTION.to_string()],
            active: 0,
        }
    }

    /// Handle a click on `item_id`. An unknown id leaves the state untouched.
    pub fn select(&mut self, item_id: &str) -> Result<&MenuItem, MenuError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| MenuError::UnknownItem(item_id.to_string()))?;
        self.active = index;
        Ok(&self.items[index])
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn active_item(&self) -> &MenuItem {
        &self.items[self.active]
    }

    pub fn visible_section(&self) -> &str {
        &self.items[self.active].section
    }

    pub fn is_active(&self, item_id: &str) -> bool {
        self.active_item().id == item_id
    }

    pub fn is_visible(&self, section: &str) -> bool {
        self.visible_section() == section
    }
}

impl Default for MenuController {
    fn default() -> Self {
        Self::portal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_menu_starts_on_chat() {
        let menu = MenuController::portal();
        assert!(menu.is_active("chat"));
        assert!(menu.is_visible(CHAT_SECTION));
    }

    #[test]
    fn test_select_switches_item_and_section() {
        let mut menu = MenuController::portal();
        let item = menu.select("tramites").unwrap();
        assert_eq!(item.label, "Trámites");

        assert!(menu.is_active("tramites"));
        assert!(!menu.is_active("chat"));
        assert!(menu.is_visible(TRAMITES_SECTION));
        assert!(!menu.is_visible(CHAT_SECTION));

        let active = menu.items().iter().filter(|i| menu.is_active(&i.id)).count();
        let visible = menu.sections().iter().filter(|s| menu.is_visible(s)).count();
        assert_eq!((active, visible), (1, 1));
    }

    #[test]
    fn test_unknown_item_keeps_state() {
        let mut menu = MenuController::portal();
        menu.select("tramites").unwrap();
        assert_eq!(
            menu.select("noticias").unwrap_err(),
            MenuError::UnknownItem("noticias".to_string())
        );
        assert!(menu.is_visible(TRAMITES_SECTION));
    }

    #[test]
    fn test_mismatched_section_is_rejected_up_front() {
        let err = MenuController::new(
            vec![MenuItem::new("chat", "Chat Asistente", "chat")],
            vec![CHAT_SECTION.to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, MenuError::UnknownSection { .. }));
        assert_eq!(MenuController::new(vec![], vec![]).unwrap_err(), MenuError::Empty);
    }
}
