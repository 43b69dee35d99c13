// src/services/extractor.rs

//! Generic menu extractor.
//!
//! One extractor serves every vendor. The vendor's declared shape picks the
//! walk, and each record kind reads only the levels it needs, so a malformed
//! nutrient cannot take the vendor's periods or foods down with it. Every
//! emitted record carries the ancestor identifiers needed to link it
//! downstream.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{
    Category, Food, Menu, MenuDocument, Nutrient, Period, RawCategory, RawItem, RawNutrient,
    RecordKind, Shape, Table, VendorId, VendorSpec,
};

/// A category together with the period it was listed under.
type ScopedCategory = (Option<VendorId>, RawCategory);

/// Extracts canonical records from one vendor's raw menu document.
pub struct MenuExtractor<'a> {
    vendor: &'a VendorSpec,
}

impl<'a> MenuExtractor<'a> {
    pub fn new(vendor: &'a VendorSpec) -> Self {
        Self { vendor }
    }

    /// Extract the records of `kind` as a table.
    pub fn extract(&self, kind: RecordKind, document: &Value) -> Result<Table> {
        match kind {
            RecordKind::Periods => Table::from_records(&self.periods(document)?),
            RecordKind::Categories => Table::from_records(&self.categories(document)?),
            RecordKind::Foods => Table::from_records(&self.foods(document)?),
            RecordKind::Nutrients => Table::from_records(&self.nutrients(document)?),
        }
    }

    pub fn periods(&self, document: &Value) -> Result<Vec<Period>> {
        let menu = self.parse(document)?;
        let periods = self.read(menu.periods())?;
        Ok(periods
            .into_iter()
            .map(|period| Period {
                restaurant_id: self.restaurant_id(),
                period_id: period.id,
                period_name: period.name,
            })
            .collect())
    }

    pub fn categories(&self, document: &Value) -> Result<Vec<Category>> {
        let menu = self.parse(document)?;
        Ok(self
            .scoped_categories(&menu)?
            .into_iter()
            .map(|(period_id, category)| Category {
                restaurant_id: self.restaurant_id(),
                period_id,
                category_id: category.id,
                category_name: category.name,
            })
            .collect())
    }

    pub fn foods(&self, document: &Value) -> Result<Vec<Food>> {
        let menu = self.parse(document)?;
        let mut foods = Vec::new();
        for (period_id, category) in self.scoped_categories(&menu)? {
            for item in self.read(category.items.parse::<RawItem>())? {
                foods.push(Food {
                    restaurant_id: self.restaurant_id(),
                    period_id: period_id.clone(),
                    category_id: category.id.clone(),
                    food_id: item.id,
                    food_name: item.name,
                });
            }
        }
        Ok(foods)
    }

    pub fn nutrients(&self, document: &Value) -> Result<Vec<Nutrient>> {
        let menu = self.parse(document)?;
        let mut nutrients = Vec::new();
        for (_, category) in self.scoped_categories(&menu)? {
            for item in self.read(category.items.parse::<RawItem>())? {
                for nutrient in self.read(item.nutrients.parse::<RawNutrient>())? {
                    nutrients.push(Nutrient {
                        food_id: item.id.clone(),
                        nutrient_name: nutrient.name,
                        nutrient_value: nutrient.value,
                    });
                }
            }
        }
        Ok(nutrients)
    }

    /// Parse the `menu` wrapper and check it against the declared shape.
    fn parse(&self, document: &Value) -> Result<Menu> {
        let menu = self.read(MenuDocument::deserialize(document))?.menu;
        let declared = self.vendor.shape;

        match declared {
            Shape::Flat if menu.categories.is_null() => {
                return Err(AppError::extract(
                    &self.vendor.label,
                    "flat menu has no top-level categories",
                ));
            }
            Shape::PeriodScoped | Shape::SinglePeriod
                if menu.periods.is_null() && menu.categories.has_entries() =>
            {
                return Err(AppError::extract(
                    &self.vendor.label,
                    format!("{declared:?} menu has categories but no periods"),
                ));
            }
            _ => {}
        }

        let detected = menu.detected_shape();
        if detected != declared {
            log::debug!(
                "{}: declared {:?} menu, document looks {:?}",
                self.vendor.label,
                declared,
                detected
            );
        }
        Ok(menu)
    }

    /// Categories paired with their period id.
    ///
    /// Flat menus have no period wrapper, so their categories carry none.
    fn scoped_categories(&self, menu: &Menu) -> Result<Vec<ScopedCategory>> {
        if self.vendor.shape == Shape::Flat {
            let categories = self.read(menu.categories())?;
            return Ok(categories.into_iter().map(|c| (None, c)).collect());
        }

        let mut scoped = Vec::new();
        for period in self.read(menu.periods())? {
            for category in self.read(period.categories.parse::<RawCategory>())? {
                scoped.push((Some(period.id.clone()), category));
            }
        }
        Ok(scoped)
    }

    fn read<T>(&self, parsed: serde_json::Result<T>) -> Result<T> {
        parsed.map_err(|e| AppError::extract(&self.vendor.label, e))
    }

    fn restaurant_id(&self) -> Option<VendorId> {
        self.vendor
            .restaurant_id
            .as_deref()
            .map(VendorId::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sushido() -> VendorSpec {
        VendorSpec::new("sushido", "loc-sushido")
    }

    fn two_period_menu() -> Value {
        json!({
            "menu": {
                "periods": [
                    {
                        "id": "p-lunch",
                        "name": "Lunch",
                        "categories": [
                            {
                                "id": "c-rolls",
                                "name": "Rolls",
                                "items": [
                                    {
                                        "id": 101,
                                        "name": "California Roll",
                                        "nutrients": [
                                            {"name": "Calories", "value": "250"},
                                            {"name": "Protein (g)", "value": 9}
                                        ]
                                    },
                                    {"id": 102, "name": "Spicy Tuna Roll"}
                                ]
                            },
                            {"id": "c-empty", "name": "Specials", "items": []}
                        ]
                    },
                    {"id": "p-dinner", "name": "Dinner"}
                ]
            }
        })
    }

    #[test]
    fn periods_from_list() {
        let vendor = sushido();
        let periods = MenuExtractor::new(&vendor)
            .periods(&two_period_menu())
            .unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[1].period_name, "Dinner");
        assert!(periods[0].restaurant_id.is_none());
    }

    #[test]
    fn foods_carry_ancestor_ids() {
        let vendor = sushido().with_restaurant_id("r-1");
        let foods = MenuExtractor::new(&vendor)
            .foods(&two_period_menu())
            .unwrap();
        assert_eq!(foods.len(), 2);
        assert_eq!(foods[0].restaurant_id, Some(VendorId::from("r-1")));
        assert_eq!(foods[0].period_id, Some(VendorId::from("p-lunch")));
        assert_eq!(foods[0].category_id, VendorId::from("c-rolls"));
        assert_eq!(foods[1].food_id, VendorId::from(102u64));
    }

    #[test]
    fn empty_children_yield_no_records() {
        let vendor = sushido();
        let extractor = MenuExtractor::new(&vendor);
        let doc = two_period_menu();

        let categories = extractor.categories(&doc).unwrap();
        assert_eq!(categories.len(), 2);

        let nutrients = extractor.nutrients(&doc).unwrap();
        assert_eq!(nutrients.len(), 2);
        assert!(nutrients.iter().all(|n| n.food_id == VendorId::from(101u64)));
    }

    #[test]
    fn single_period_matches_one_element_list() {
        let vendor = sushido();
        let extractor = MenuExtractor::new(&vendor);
        let period = json!({
            "id": 7,
            "name": "All Day",
            "categories": [{"id": 1, "name": "Bowls", "items": [
                {"id": 11, "name": "Poke", "nutrients": [{"name": "Calories", "value": 540}]}
            ]}]
        });
        let single = json!({"menu": {"periods": period.clone()}});
        let listed = json!({"menu": {"periods": [period]}});

        for kind in RecordKind::ALL {
            assert_eq!(
                extractor.extract(kind, &single).unwrap(),
                extractor.extract(kind, &listed).unwrap(),
                "{kind} differs between single-object and list periods"
            );
        }
    }

    #[test]
    fn flat_menu_categories_have_no_period() {
        let vendor = sushido().with_shape(Shape::Flat);
        let extractor = MenuExtractor::new(&vendor);
        let doc = json!({
            "menu": {
                "periods": [{"id": "p1", "name": "Everyday"}],
                "categories": [
                    {"id": "c1", "name": "Coffee", "items": [{"id": "f1", "name": "Latte"}]}
                ]
            }
        });

        let periods = extractor.periods(&doc).unwrap();
        assert_eq!(periods.len(), 1);

        let foods = extractor.foods(&doc).unwrap();
        assert_eq!(foods.len(), 1);
        assert!(foods[0].period_id.is_none());

        let table = extractor.extract(RecordKind::Categories, &doc).unwrap();
        assert_eq!(table.columns(), ["category_id", "category_name"]);
    }

    #[test]
    fn missing_keys_fail_with_vendor_context() {
        let vendor = sushido();
        let err = MenuExtractor::new(&vendor)
            .foods(&json!({"menu": {"periods": [{"id": 1, "name": "Lunch", "categories": [
                {"id": 2, "name": "Sides", "items": [{"name": "Fries"}]}
            ]}]}}))
            .unwrap_err();
        assert!(matches!(err, AppError::Extract { ref vendor, .. } if vendor == "sushido"));
    }

    #[test]
    fn bad_nutrient_only_fails_nutrients() {
        let vendor = sushido();
        let extractor = MenuExtractor::new(&vendor);
        let mut doc = two_period_menu();
        doc["menu"]["periods"][0]["categories"][0]["items"][0]["nutrients"][1] =
            json!({"name": "Sodium (mg)"});

        assert_eq!(extractor.periods(&doc).unwrap().len(), 2);
        assert_eq!(extractor.categories(&doc).unwrap().len(), 2);
        assert_eq!(extractor.foods(&doc).unwrap().len(), 2);

        let err = extractor.nutrients(&doc).unwrap_err();
        assert!(err.to_string().contains("value"), "{err}");
    }

    #[test]
    fn null_children_are_empty() {
        let vendor = sushido();
        let extractor = MenuExtractor::new(&vendor);
        let doc = json!({"menu": {"periods": [
            {"id": 1, "name": "Lunch", "categories": [
                {"id": 2, "name": "Grill", "items": [
                    {"id": 3, "name": "Burger", "nutrients": null}
                ]},
                {"id": 4, "name": "Closed", "items": null}
            ]},
            {"id": 5, "name": "Dinner", "categories": null}
        ]}});

        assert_eq!(extractor.categories(&doc).unwrap().len(), 2);
        assert_eq!(extractor.foods(&doc).unwrap().len(), 1);
        assert!(extractor.nutrients(&doc).unwrap().is_empty());
    }

    #[test]
    fn declared_shape_drives_the_walk() {
        let vendor = sushido();
        let doc = json!({"menu": {
            "categories": [],
            "periods": [{"id": "p1", "name": "Lunch", "categories": [
                {"id": "c1", "name": "Rolls", "items": [{"id": 1, "name": "Dragon Roll"}]}
            ]}]
        }});

        let foods = MenuExtractor::new(&vendor).foods(&doc).unwrap();
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].period_id, Some(VendorId::from("p1")));
    }

    #[test]
    fn shape_mismatch_fails_instead_of_emptying() {
        let flat = sushido().with_shape(Shape::Flat);
        let scoped_doc = two_period_menu();
        let err = MenuExtractor::new(&flat).foods(&scoped_doc).unwrap_err();
        assert!(matches!(err, AppError::Extract { ref vendor, .. } if vendor == "sushido"));

        let scoped = sushido();
        let flat_doc = json!({"menu": {"categories": [
            {"id": "c1", "name": "Coffee", "items": [{"id": "f1", "name": "Latte"}]}
        ]}});
        assert!(MenuExtractor::new(&scoped).foods(&flat_doc).is_err());
        assert!(MenuExtractor::new(&scoped).periods(&flat_doc).is_err());
    }

    #[test]
    fn missing_periods_is_empty_not_error() {
        let vendor = sushido();
        let periods = MenuExtractor::new(&vendor)
            .periods(&json!({"menu": {"periods": null}}))
            .unwrap();
        assert!(periods.is_empty());
    }
}
