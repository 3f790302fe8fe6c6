use crate::models::CatalogItem;

pub const DEFAULT_DRINK: &str = "Water";

pub const DRINK_TYPES: [&str; 11] = [
    "Water",
    "Cola",
    "Coffee",
    "Tea",
    "Energy Drink",
    "Juice",
    "Milk",
    "Lemonade",
    "Soda",
    "Iced Tea",
    "Sports Drink",
];

const CAFFEINATED: [&str; 4] = ["cola", "coffee", "tea", "energy drink"];

pub fn is_caffeinated(drink_type: &str) -> bool {
    let name = drink_type.trim().to_lowercase();
    CAFFEINATED.contains(&name.as_str())
}

pub fn catalog() -> Vec<CatalogItem> {
    DRINK_TYPES
        .iter()
        .map(|&name| CatalogItem {
            name,
            caffeinated: is_caffeinated(name),
        })
        .collect()
}
