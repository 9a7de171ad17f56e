//! Enumerates every reachable combination of cascading choice widgets,
//! like dependent `<select>` elements of a search form.

pub use cache::*;
pub use cascade::*;
pub use config::*;
pub use enumerator::*;
pub use error::*;
pub use field::*;
pub use form::*;
pub use html::read_fields;
pub use memory::*;
pub use path::*;
pub use tree::*;

mod cache;
mod cascade;
mod config;
mod enumerator;
mod error;
mod field;
mod form;
mod html;
mod memory;
mod path;
mod tree;

#[cfg(test)]
mod testing;

/// Enumerates the cascade found in HTML snapshot.
///
/// Options of the snapshot are fixed, dependents only return to their first
/// option when something before them changes. Result goes through the cache
/// when one is configured.
pub fn enumerate_html(html: &str, config: &CascadeConfig) -> Result<ResultTree, CascadeError> {
    let run = || {
        let mut cascade = MemoryCascade::from_html(html, &config.selector, ResetSource)?;
        Enumerator::new(&mut cascade).run()
    };
    match config.cache.as_ref() {
        Some(cache) => cache.create_cache().fetch(run),
        None => run(),
    }
}
