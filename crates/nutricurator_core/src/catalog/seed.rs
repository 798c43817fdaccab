//! Built-in demo catalog.

use super::Catalog;
use crate::model::product::{Category, Nutrition, Product};

/// Small fixed catalog for demos, the CLI probe and tests.
pub fn demo_catalog() -> Catalog {
    let categories = vec![
        Category::new(1, "Ready meals", "Meals"),
        Category::new(2, "Grains", "Staples"),
        Category::new(3, "Snacks", "Snacks"),
        Category::new(4, "Dairy", "Fresh"),
    ];

    let products = vec![
        with_nutrition(
            Product::new(10041, "Kimchi stew", "Bibigo", 1, 4_800, 6_000),
            Nutrition {
                serving_size: 460.0,
                calories_kcal: 310.0,
                protein_g: 16.0,
                fat_g: 14.0,
                carbohydrate_g: 28.0,
                sugar_g: 6.0,
                sodium_mg: 420.0,
                ..Nutrition::default()
            },
        ),
        Product::new(10046, "Low-sodium kimchi stew", "Bibigo", 1, 5_200, 6_500),
        Product::new(10047, "Chicken breast salad", "Fresh Day", 1, 6_900, 7_900),
        Product::new(10049, "Quinoa brown rice", "Hetbahn", 2, 2_300, 2_900),
        Product::new(10050, "Multigrain oats", "Quaker", 2, 8_000, 10_000),
        Product::new(10048, "Konjac jelly, peach", "Jelly Lab", 3, 11_900, 17_000),
        Product::new(10051, "Roasted almonds", "Nutty", 3, 9_900, 9_900),
        Product::new(10052, "Greek yogurt", "Maeil", 4, 3_600, 4_500),
    ];

    Catalog::new(products, categories)
}

fn with_nutrition(mut product: Product, nutrition: Nutrition) -> Product {
    product.nutrition = nutrition;
    product
}
