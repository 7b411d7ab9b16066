use std::fmt::Display;
use std::hash::Hash;

use indexmap::IndexMap;
use miette::{Result, WrapErr};
use rayon::prelude::*;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::{Request, Response, ServiceClient};

pub mod events;
pub mod items;
pub mod map_floor;
pub mod recipes;

/// Details of a kind that has no fields of its own. Whatever the object holds is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoDetails {}

/// A json object whose shape is resolved later, by a nested family.
pub type RawObject = Map<String, Value>;

/// An endpoint that lists everything it has, usually all ids.
pub trait EndPoint {
    type RType: DeserializeOwned;
    fn get_url() -> &'static str;

    fn get<C: ServiceClient>(client: &C) -> Result<Response<Self::RType>> {
        client
            .send(&Request::new(Self::get_url()))
            .wrap_err_with(|| format!("failed to get {}", Self::get_url()))
    }
}

/// An endpoint that answers `?ids=1,2,3` with the matching entries.
pub trait EndPointIds {
    type Id: Display + Copy + Eq + Hash + Send + Sync;
    type RType: DeserializeOwned;
    fn get_url() -> &'static str;

    fn get_with_ids<C: ServiceClient>(client: &C, ids: &[Self::Id]) -> Result<Response<Self::RType>> {
        client
            .send(&Request::new(Self::get_url()).ids(ids))
            .wrap_err_with(|| format!("failed to get {} ids from {}", ids.len(), Self::get_url()))
    }
}

/// Fetches `ids` in batches of the client's batch size and converts every entry.
///
/// Batches are fetched and converted in parallel. The output follows the order of `ids`, ids the
/// api didn't return are skipped.
pub(crate) fn get_converted<E, C, T>(
    client: &C,
    ids: &[E::Id],
    id_of: impl Fn(&T) -> E::Id + Sync,
    convert: impl Fn(Value) -> crate::error::Result<T> + Sync,
) -> Result<Vec<T>>
where
    E: EndPointIds<RType = Vec<Value>>,
    C: ServiceClient,
    T: Send,
{
    let batch_size = client.batch_size().max(1);
    debug!(
        url = E::get_url(),
        ids = ids.len(),
        batch_size,
        "fetching in batches"
    );
    let batches = ids
        .par_chunks(batch_size)
        .map(|batch| -> Result<Vec<T>> {
            let response = E::get_with_ids(client, batch)?;
            let mut converted = response
                .content
                .into_iter()
                .map(|raw| convert(raw).map(|entity| (id_of(&entity), entity)))
                .collect::<crate::error::Result<IndexMap<_, _>>>()
                .wrap_err_with(|| format!("failed to convert entries of {}", E::get_url()))?;
            Ok(batch
                .iter()
                .filter_map(|id| converted.swap_remove(id))
                .collect::<Vec<T>>())
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(batches.into_iter().flatten().collect())
}
