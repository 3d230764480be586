// Server-side logic shared by the HTTP layer and tests: the Brave Search
// upstream client and sandboxed filesystem access. HTTP concerns (status
// codes, response shapes) stay in the api crate.

pub mod files;
pub mod search;
