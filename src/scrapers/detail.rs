use crate::error::ExtractionError;
use crate::models::ListingDetail;
use crate::scrapers::query::{text_of, Query};
use scraper::Html;

const DESCRIPTION_CLASS: &str = "propertydescriptionfull";
const FEATURE_CLASS: &str = "propertyfeature";

/// Pull the full description and the feature list out of a listing page
///
/// Both blocks are required. If a page repeats a block the first one is used.
pub fn extract_detail(html: &str) -> Result<ListingDetail, ExtractionError> {
    let document = Html::parse_document(html);

    let description = Query::tag_with_class("div", DESCRIPTION_CLASS)?.require(&document)?;
    let features = Query::tag_with_class("div", FEATURE_CLASS)?.require(&document)?;

    Ok(ListingDetail::new(
        &text_of(description),
        &text_of(features),
    ))
}
