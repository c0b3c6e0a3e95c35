/*
 * This module defines the structured device model produced by extraction.
 * A device is created empty for the role the classifier picked, populated
 * in one pass by the matching extractor, and read-only afterwards.
 */

pub mod device;
pub mod interface;
pub mod route;
