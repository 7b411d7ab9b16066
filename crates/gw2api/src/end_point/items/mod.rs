mod contract;
mod converter;

pub use contract::*;
pub use converter::*;

use crate::model::{Item, ItemId};
use crate::prelude::*;

const E_P_URL: &str = const_format::concatcp!(API_V2, "/items");

pub struct Items;

impl EndPoint for Items {
    type RType = Vec<ItemId>;
    fn get_url() -> &'static str {
        E_P_URL
    }
}

impl EndPointIds for Items {
    type Id = ItemId;
    type RType = Vec<Value>;

    fn get_url() -> &'static str {
        E_P_URL
    }
}

/// every item id the api knows
pub fn get_item_ids<C: ServiceClient>(client: &C) -> Result<Vec<ItemId>> {
    Ok(Items::get(client)?.content)
}

/// Items with `ids`, in the order of `ids`. Unknown ids are skipped by the api.
pub fn get_items<C: ServiceClient>(
    client: &C,
    registries: &Registries,
    ids: &[ItemId],
) -> Result<Vec<Item>> {
    let converter = ItemConverter::new(registries);
    super::get_converted::<Items, _, _>(client, ids, |item: &Item| item.id, |raw| {
        converter.convert(raw)
    })
}
