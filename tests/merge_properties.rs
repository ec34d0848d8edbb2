//! Property tests: arbitrary static routes merge into a trie that still
//! resolves every route to its own handler.

use std::collections::BTreeSet;

use axum::http::Method;
use branch_router::{Router, Routes, RoutingOptions};
use proptest::prelude::*;

fn route_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("(/[a-c]{1,3}){1,3}", 1..12)
}

proptest! {
    #[test]
    fn every_static_route_resolves_to_its_handler(
        routes in route_set(),
        order in any::<prop::sample::Index>(),
    ) {
        let mut routes: Vec<String> = routes.into_iter().collect();
        let pivot = order.index(routes.len());
        routes.rotate_left(pivot);

        let mut router = Router::new(RoutingOptions::default().case_sensitive(true));
        for route in &routes {
            router.get(route, route.clone()).unwrap();
        }

        for route in &routes {
            let layers = router.lookup(&Method::GET, route, None).unwrap();
            let names: Vec<&String> = layers.iter().map(|layer| layer.handler).collect();
            prop_assert_eq!(names, vec![route]);
        }
    }

    #[test]
    fn unregistered_paths_resolve_to_nothing(
        routes in route_set(),
        candidate in "(/[a-d]{1,3}){1,3}",
    ) {
        let mut router = Router::new(RoutingOptions::default().case_sensitive(true));
        for route in &routes {
            router.get(route, route.clone()).unwrap();
        }

        let layers = router.lookup(&Method::GET, &candidate, None).unwrap();
        if routes.contains(&candidate) {
            prop_assert_eq!(layers.len(), 1);
        } else {
            prop_assert!(layers.is_empty());
        }
    }
}
