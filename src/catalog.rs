// src/catalog.rs
//! Static lookup tables shared by the prompts and the search flows.

pub const CLOTHING_CATEGORIES: &[&str] = &[
    "Top", "Tops", "Clothing", "Bottom", "Bottoms", "Pants", "Footwear", "Shoes",
    "Activewear", "Outerwear", "Sweaters", "Accessory", "Accessories", "TShirts",
    "Jeans", "Hats", "Headware", "Sweatshirts",
];

pub const CLOTHING_STYLES: &[&str] = &[
    "Casual", "Formal", "Vintage", "Streetwear", "Sporty", "Bohemian", "Minimalist",
    "Gothic", "Preppy", "Grunge", "Artistic", "Exotic",
];

pub const PREFERRED_BRANDS: &[&str] = &[
    "Allbirds", "Allbirds AU", "Allbirds NZ", "Backcountry", "Belstaff",
    "Belstaff (Europe)", "Belstaff UK", "Bloomingdale", "Bloomingdale AU",
    "Bloomingdale UK", "Champion.com (Hanesbrands Inc.)", "Culture Kings",
    "Culture Kings US", "D1 Milano", "Dynamite Clothing", "Fanatics", "Fanatics UK",
    "Fabletics Europe", "Fabletics eur", "Fabletics uk", "FEATURE", "Flag & Anthem",
    "FootJoy", "GOLF le Fleur", "Garage Clothing", "JanSport", "Kappa",
    "Kut from the Kloth", "LUISAVIAROMA", "Luxury Closet", "Luxury Closet eur",
    "Luxury Closet uk", "MLB", "MLB AU", "MLB CA", "MLB UK", "MLS", "MLS CA",
    "MYTHERESA", "MYTHERESA au", "MYTHERESA ca", "MYTHERESA eur", "MYTHERESA uk",
    "Mytheresa", "NBA", "NBA AU", "NBA CA", "NBA UK", "NFL", "NFL CA", "NFL UK", "NHL",
    "NHL CA", "NHL UK", "NIKE", "Nisolo", "North Face UK", "North Face uk", "Osprey",
    "PGA", "PUMA", "PUMA India", "PUMA Thailand", "Poshmark", "SKECHERS eur",
    "Skechers", "Street Machine Skate", "Taylor Stitch", "The Double F", "UGG",
    "UGG US", "Unique Vintage", "WNBA",
];

pub const LINGERIE_BRANDS: &[&str] = &[
    "Savage x Fenty", "The Tight Spot", "The Tight Spot ca", "The Tight Spot eur",
    "The Tight Spot uk", "The Tight Spot au", "Maidenform", "Bali Bras", "onehanesplace",
];

/// Brands the complementary search picks from.
pub const COMPLEMENTARY_BRANDS: &[&str] = &[
    "Unique Vintage", "PUMA", "Osprey", "NBA", "Kappa", "Fanatics", "Nisolo",
    "Backcountry", "Allbirds", "FEATURE", "MLB", "PGA", "NHL", "Flag & Anthem", "MLS",
    "NFL", "GOLF le Fleur", "Taylor Stitch", "The North Face", "NIKE", "LUISAVIAROMA",
    "FootJoy", "The Luxury Closet", "Savage X Fenty", "Bali Bras", "Belstaff",
    "Belstaff UK", "Culture Kings US", "D1 Milano", "Double F", "onehanesplace.com",
    "Jansport", "Kut from the Kloth", "Maidenform", "UGG US",
];

pub const DEFAULT_COMPLEMENTARY_CATEGORIES: [&str; 2] = ["Shoes", "Accessories"];

/// Categories that pair with `category`, or `None` for an unknown category.
pub fn complementary_categories(category: &str) -> Option<&'static [&'static str]> {
    let pairs: &'static [&'static str] = match category {
        "Top" | "Tops" | "TShirts" | "Sweatshirts" | "Sweaters" => &["Pants", "Shoes"],
        "Outerwear" => &["Pants", "Tops"],
        "Bottom" | "Bottoms" | "Pants" | "Jeans" => &["Tops", "Shoes"],
        "Footwear" | "Shoes" | "Accessory" | "Accessories" | "Hats" | "Headware" => {
            &["Tops", "Pants"]
        }
        "Activewear" | "Clothing" => &["Shoes", "Accessories"],
        _ => return None,
    };
    Some(pairs)
}

/// Brand list offered to the vision model.
pub fn brand_list(include_lingerie: bool) -> Vec<&'static str> {
    let mut brands = PREFERRED_BRANDS.to_vec();
    if include_lingerie {
        brands.extend_from_slice(LINGERIE_BRANDS);
    }
    brands
}

const EURO_COUNTRIES: &[&str] = &[
    "Vatican City", "Germany", "Spain", "Estonia", "France", "Finland", "Greece",
    "Austria", "Portugal", "Andorra", "Belgium", "Cyprus", "Slovenia", "Slovakia",
    "San Marino", "Latvia", "Luxembourg", "Lithuania", "Montenegro", "Monaco", "Malta",
    "Netherlands", "Croatia", "Ireland", "Italy",
];

/// ISO currency code used to display prices for a country.
pub fn currency_for_country(country: &str) -> &'static str {
    match country {
        "United Kingdom" => "GBP",
        "Canada" => "CAD",
        "Australia" => "AUD",
        "India" => "INR",
        other if EURO_COUNTRIES.contains(&other) => "EUR",
        _ => "USD",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_category_has_two_complements() {
        for category in CLOTHING_CATEGORIES {
            let complements = complementary_categories(category)
                .unwrap_or_else(|| panic!("{category} has no complements"));
            assert_eq!(complements.len(), 2);
            assert!(!complements.contains(category));
        }
        assert_eq!(complementary_categories("Capes"), None);
    }

    #[test]
    fn lingerie_brands_are_opt_in() {
        let base = brand_list(false);
        assert!(!base.contains(&"Maidenform"));
        let extended = brand_list(true);
        assert_eq!(extended.len(), PREFERRED_BRANDS.len() + LINGERIE_BRANDS.len());
        assert!(extended.contains(&"Maidenform"));
    }

    #[test]
    fn currency_lookup() {
        assert_eq!(currency_for_country("United Kingdom"), "GBP");
        assert_eq!(currency_for_country("Ireland"), "EUR");
        assert_eq!(currency_for_country("India"), "INR");
        assert_eq!(currency_for_country("United States"), "USD");
        assert_eq!(currency_for_country("Narnia"), "USD");
    }
}
