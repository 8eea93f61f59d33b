//! Localized products, listing rows, and facets.
//!
//! `lookup` turns taxon reference codes into localized products, `flatten`
//! expands products into one listing row per variant, and `facets` derives
//! filterable dimensions from those rows.

pub mod facets;
pub mod flatten;
pub mod lookup;
pub mod model;

pub use facets::{
    Facet, FacetAppearance, FacetConfig, FacetSelection, FacetValue, Facets, apply_facet_filters,
    get_facets,
};
pub use flatten::{FlatRow, Swatch, flatten_product_variants, group_rows_by, listing_cards};
pub use lookup::{ProductLookup, ProductTable};
pub use model::{
    LocalizedDetail, LocalizedField, LocalizedProduct, LocalizedProductWithVariants, RawDetail,
    RawProduct, localized,
};
