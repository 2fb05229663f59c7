//! Name-only product categories.

use super::CategoryId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("category name must not be blank")]
pub struct BlankCategoryName;

impl Category {
    /// Build a category from user input, trimming the name.
    pub fn named(name: &str) -> Result<Self, BlankCategoryName> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BlankCategoryName);
        }
        Ok(Self {
            id: CategoryId::random(),
            name: name.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_names() {
        let category = Category::named("  Tools ").expect("valid name");
        assert_eq!(category.name, "Tools");
    }

    #[test]
    fn rejects_blank_names() {
        assert_eq!(Category::named("   "), Err(BlankCategoryName));
    }
}
