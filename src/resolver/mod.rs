// Collection & field resolution: decides what in the store gets classified.
//
// collections: which collections are hazard-related (keyword table + fallbacks)
// fields:      which attribute in each collection holds the free text
// extract:     streams that attribute out as text records

pub mod collections;
pub mod extract;
pub mod fields;
