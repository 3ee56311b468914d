use super::*;

// =============================================================================
// Route::matches
// =============================================================================

#[test]
fn static_route_matches_exactly() {
    let route = Route::protected("/dashboard");
    assert!(route.matches("/dashboard"));
    assert!(route.matches("/dashboard/"));
    assert!(!route.matches("/dashboard/extra"));
    assert!(!route.matches("/"));
}

#[test]
fn root_matches_only_root() {
    let route = Route::public("/");
    assert!(route.matches("/"));
    assert!(route.matches(""));
    assert!(!route.matches("/dashboard"));
}

#[test]
fn param_segment_matches_any_value() {
    let route = Route::protected("/wishlist/:id");
    assert!(route.matches("/wishlist/42"));
    assert!(route.matches("/wishlist/abc"));
    assert!(!route.matches("/wishlist"));
    assert!(!route.matches("/wishlist/42/items"));
}

#[test]
fn encoded_segments_are_decoded_before_matching() {
    let route = Route::protected("/dashboard");
    assert!(route.matches("/dash%62oard"));
    assert!(route.matches("/%64%61%73%68%62%6F%61%72%64"));
    assert!(!route.matches("/dash%2Fboard"));
}

#[test]
fn static_segments_ignore_case() {
    let route = Route::protected("/dashboard");
    assert!(route.matches("/Dashboard"));
    assert!(route.matches("/DASHBOARD/"));
    assert!(Route::protected("/wishlist/:id").matches("/WishList/AbC"));
}

#[test]
fn invalid_utf8_escape_does_not_panic() {
    assert!(!Route::protected("/dashboard").matches("/dash%FFboard"));
}

// =============================================================================
// route_path
// =============================================================================

#[test]
fn route_path_strips_query_and_fragment() {
    assert_eq!(route_path("/wishlist/1?tab=items"), "/wishlist/1");
    assert_eq!(route_path("/dashboard#top"), "/dashboard");
    assert_eq!(route_path("/sign-in"), "/sign-in");
}

// =============================================================================
// RouteTable
// =============================================================================

#[test]
fn standard_table_flags() {
    let table = RouteTable::standard("/sign-in", "/dashboard");
    assert!(!table.intent("/").requires_auth);
    assert!(!table.intent("/sign-in").requires_auth);
    assert!(table.intent("/dashboard").requires_auth);
    assert!(table.intent("/wishlist/7").requires_auth);
}

#[test]
fn unknown_route_is_public() {
    let table = RouteTable::standard("/sign-in", "/dashboard");
    let intent = table.intent("/about");
    assert!(!intent.requires_auth);
    assert!(table.find("/about").is_none());
}

#[test]
fn encoded_or_recased_protected_path_requires_auth() {
    let table = RouteTable::standard("/sign-in", "/dashboard");
    assert!(table.intent("/dash%62oard").requires_auth);
    assert!(table.intent("/Dashboard?x=1").requires_auth);
    assert!(table.intent("/wishlist%2F7").requires_auth);
}

#[test]
fn intent_keeps_full_target() {
    let table = RouteTable::standard("/sign-in", "/dashboard");
    let intent = table.intent("/wishlist/7?tab=items");
    assert_eq!(intent.target, "/wishlist/7?tab=items");
    assert_eq!(intent.path(), "/wishlist/7");
    assert!(intent.requires_auth);
}

#[test]
fn first_declared_route_wins() {
    let table = RouteTable::new()
        .with(Route::public("/wishlist/shared"))
        .with(Route::protected("/wishlist/:id"));
    assert!(!table.intent("/wishlist/shared").requires_auth);
    assert!(table.intent("/wishlist/9").requires_auth);
}
