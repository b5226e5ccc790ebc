//! Collection Service integration tests.
//!
//! Every property runs against each store backend.



use std::sync::Arc;

use watchlist::{AuthGate, CollectionService, ModelStore, Session, SharedPasswordGate};

pub const PASSWORD: &str = "movienight";

/// A service over `store` plus a signed-in session.
pub fn signed_in<S: ModelStore>(store: S) -> (CollectionService<S>, Session) {
    let gate = Arc::new(SharedPasswordGate::new(PASSWORD));
    let token = gate.authenticate(PASSWORD).unwrap();
    (
        CollectionService::new(store, gate),
        Session::with_token(token.token),
    )
}

/// Expand generic `fn name<S: ModelStore>(store: S)` checks into one
/// `#[test]` per backend.
#[macro_export]
macro_rules! per_store {
    ($($check:ident),* $(,)?) => {
        mod in_memory {
            $(
                #[test]
                fn $check() {
                    super::$check(watchlist::InMemoryModelStore::new());
                }
            )*
        }

        #[cfg(feature = "sqlite")]
        mod sqlite {
            $(
                #[test]
                fn $check() {
                    super::$check(watchlist::SqliteModelStore::open_in_memory().unwrap());
                }
            )*
        }
    };
}
