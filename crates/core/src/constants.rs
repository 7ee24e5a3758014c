/// Vendor quantity token meaning "more than ten in stock"
pub const QUANTITY_MANY_TOKEN: &str = ">10";

/// Stock count reported for [`QUANTITY_MANY_TOKEN`]
pub const QUANTITY_MANY_STOCK: u32 = 100;

/// Vendor quantity token meaning "last unit, treat as unavailable"
pub const QUANTITY_LAST_UNIT_TOKEN: &str = "1";

/// Stock count reported for [`QUANTITY_LAST_UNIT_TOKEN`]
pub const QUANTITY_LAST_UNIT_STOCK: u32 = 0;
