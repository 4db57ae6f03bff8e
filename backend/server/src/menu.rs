use std::collections::HashMap;

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    database::{Database, Record},
    error::AppError,
    models::{CoffeeOption, DrinkType, MilkOption, Size},
    payloads::{
        CoffeeOptionResponse, DrinkTypeCreate, DrinkTypePatch, MilkOptionCreate, MilkOptionPatch,
        SizeCreate, SizePatch,
    },
};

/// The three admin-curated menu lists share one set of handlers.
pub trait MenuItem: Record + Serialize + Clone + 'static {
    const LABEL: &'static str;

    type Create: DeserializeOwned + Send + 'static;
    type Patch: DeserializeOwned + Send + 'static;

    fn create(payload: Self::Create) -> Self;

    fn apply(&mut self, patch: Self::Patch);

    fn name(&self) -> &str;

    fn display_order(&self) -> i32;

    fn is_active(&self) -> bool;

    fn deactivate(&mut self);
}

impl MenuItem for DrinkType {
    const LABEL: &'static str = "Drink type";

    type Create = DrinkTypeCreate;
    type Patch = DrinkTypePatch;

    fn create(payload: DrinkTypeCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: payload.name,
            display_order: payload.display_order,
            is_active: true,
        }
    }

    fn apply(&mut self, patch: DrinkTypePatch) {
        patch.apply(self);
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn display_order(&self) -> i32 {
        self.display_order
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self) {
        self.is_active = false;
    }
}

impl MenuItem for Size {
    const LABEL: &'static str = "Size";

    type Create = SizeCreate;
    type Patch = SizePatch;

    fn create(payload: SizeCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: payload.name,
            abbreviation: payload.abbreviation,
            display_order: payload.display_order,
            is_active: true,
        }
    }

    fn apply(&mut self, patch: SizePatch) {
        patch.apply(self);
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn display_order(&self) -> i32 {
        self.display_order
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self) {
        self.is_active = false;
    }
}

impl MenuItem for MilkOption {
    const LABEL: &'static str = "Milk option";

    type Create = MilkOptionCreate;
    type Patch = MilkOptionPatch;

    fn create(payload: MilkOptionCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: payload.name,
            display_order: payload.display_order,
            is_active: true,
        }
    }

    fn apply(&mut self, patch: MilkOptionPatch) {
        patch.apply(self);
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn display_order(&self) -> i32 {
        self.display_order
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Active items by `(display_order, name)`.
pub fn active_sorted<T: MenuItem>(mut items: Vec<T>) -> Vec<T> {
    items.retain(T::is_active);
    items.sort_by(|a, b| {
        a.display_order()
            .cmp(&b.display_order())
            .then_with(|| a.name().cmp(b.name()))
    });

    items
}

/// The names a coffee option resolves to, ready to snapshot into an order item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDrink {
    pub drink_type_name: String,
    pub size_name: String,
    pub size_abbreviation: String,
    pub milk_option_name: Option<String>,
}

/// Whole menu loaded once per request, deactivated rows included.
///
/// Deactivating a menu row hides it from pickers but options and orders that point at it keep
/// resolving.
pub struct Menu {
    drink_types: HashMap<Uuid, DrinkType>,
    sizes: HashMap<Uuid, Size>,
    milk_options: HashMap<Uuid, MilkOption>,
}

impl Menu {
    pub async fn load(db: &Database) -> Result<Self, AppError> {
        Ok(Self::new(
            db.all().await?,
            db.all().await?,
            db.all().await?,
        ))
    }

    pub fn new(drink_types: Vec<DrinkType>, sizes: Vec<Size>, milk_options: Vec<MilkOption>) -> Self {
        Self {
            drink_types: drink_types.into_iter().map(|d| (d.id, d)).collect(),
            sizes: sizes.into_iter().map(|s| (s.id, s)).collect(),
            milk_options: milk_options.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    /// Every reference must resolve.
    pub fn resolve(&self, option: &CoffeeOption) -> Result<ResolvedDrink, AppError> {
        let drink_type = self.drink_types.get(&option.drink_type_id).ok_or_else(|| {
            AppError::BadRequest(format!("Drink type {} not found", option.drink_type_id))
        })?;

        let size = self.sizes.get(&option.size_id).ok_or_else(|| {
            AppError::BadRequest(format!("Size {} not found", option.size_id))
        })?;

        let milk_option_name = match option.milk_option_id {
            Some(id) => Some(
                self.milk_options
                    .get(&id)
                    .ok_or_else(|| AppError::BadRequest(format!("Milk option {id} not found")))?
                    .name
                    .clone(),
            ),
            None => None,
        };

        Ok(ResolvedDrink {
            drink_type_name: drink_type.name.clone(),
            size_name: size.name.clone(),
            size_abbreviation: size.abbreviation.clone(),
            milk_option_name,
        })
    }

    /// Lenient, unknown references show as `None`.
    pub fn describe(&self, option: &CoffeeOption) -> CoffeeOptionResponse {
        let drink_type = self.drink_types.get(&option.drink_type_id);
        let size = self.sizes.get(&option.size_id);
        let milk_option = option
            .milk_option_id
            .and_then(|id| self.milk_options.get(&id));

        CoffeeOptionResponse {
            id: option.id,
            colleague_id: option.colleague_id,
            drink_type_id: option.drink_type_id,
            drink_type_name: drink_type.map(|d| d.name.clone()),
            size_id: option.size_id,
            size_name: size.map(|s| s.name.clone()),
            size_abbreviation: size.map(|s| s.abbreviation.clone()),
            milk_option_id: option.milk_option_id,
            milk_option_name: milk_option.map(|m| m.name.clone()),
            sugar: option.sugar,
            notes: option.notes.clone(),
            is_default: option.is_default,
            display_order: option.display_order,
            created_at: option.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn drink(name: &str, display_order: i32, is_active: bool) -> DrinkType {
        DrinkType {
            id: Uuid::new_v4(),
            name: name.to_string(),
            display_order,
            is_active,
        }
    }

    fn size() -> Size {
        Size::create(SizeCreate {
            name: "Regular".to_string(),
            abbreviation: "Reg".to_string(),
            display_order: 0,
        })
    }

    fn option(drink_type_id: Uuid, size_id: Uuid, milk_option_id: Option<Uuid>) -> CoffeeOption {
        CoffeeOption {
            id: Uuid::new_v4(),
            colleague_id: Uuid::new_v4(),
            drink_type_id,
            size_id,
            milk_option_id,
            sugar: 0,
            notes: None,
            is_default: true,
            display_order: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_active_sorted() {
        let items = vec![
            drink("Mocha", 2, true),
            drink("Latte", 1, true),
            drink("Espresso", 2, true),
            drink("Retired", 0, false),
        ];

        let names: Vec<String> = active_sorted(items).into_iter().map(|d| d.name).collect();
        assert_eq!(names, ["Latte", "Espresso", "Mocha"]);
    }

    #[test]
    fn test_resolve() {
        let latte = drink("Latte", 0, false);
        let regular = size();
        let oat = MilkOption::create(MilkOptionCreate {
            name: "Oat".to_string(),
            display_order: 0,
        });
        let option = option(latte.id, regular.id, Some(oat.id));
        let menu = Menu::new(vec![latte], vec![regular], vec![oat]);

        assert_eq!(
            menu.resolve(&option).unwrap(),
            ResolvedDrink {
                drink_type_name: "Latte".to_string(),
                size_name: "Regular".to_string(),
                size_abbreviation: "Reg".to_string(),
                milk_option_name: Some("Oat".to_string()),
            }
        );
    }

    #[test]
    fn test_resolve_missing_milk() {
        let latte = drink("Latte", 0, true);
        let regular = size();
        let missing = Uuid::new_v4();
        let option = option(latte.id, regular.id, Some(missing));
        let menu = Menu::new(vec![latte], vec![regular], vec![]);

        assert_eq!(
            menu.resolve(&option).unwrap_err().to_string(),
            format!("Milk option {missing} not found")
        );

        let described = menu.describe(&option);
        assert_eq!(described.drink_type_name.as_deref(), Some("Latte"));
        assert_eq!(described.milk_option_name, None);
    }
}
