//! Schema items the models add to the platform's base schema.
//!
//! These tables are data: the driver declares them on a scenario before a
//! run, and the model source gives them meaning. Declaration order is
//! preserved because some platform backends replay it verbatim.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::platform::ItemSpec;

/// Indices shared by most storage parameters.
const IDX_STORAGE: &[&str] = &["node", "technology", "level", "year", "time"];

static MESSAGE_ITEMS: Lazy<IndexMap<&'static str, ItemSpec>> = Lazy::new(|| {
    IndexMap::from([
        // Storage level, exempt from the commodity balance
        ("level_storage", ItemSpec::set(&[])),
        // Storage reservoir technologies
        ("storage_tec", ItemSpec::set(&[])),
        // Reservoir to charger/discharger mapping
        (
            "map_tec_storage",
            ItemSpec::set(&["technology", "storage_tec"]),
        ),
        // Order of sub-annual time steps
        ("time_seq", ItemSpec::par(&["lvl_temporal", "time"])),
        // Relates storage content in two time steps or periods
        (
            "relation_storage",
            ItemSpec::par(&[
                "node",
                "technology",
                "level",
                "year",
                "year",
                "time",
                "time",
            ])
            .with_idx_names(&[
                "node",
                "technology",
                "level",
                "year_first",
                "year_last",
                "time_first",
                "time_last",
            ]),
        ),
        // Reservoir bounds as a share of installed capacity
        ("bound_storage_lo", ItemSpec::par(IDX_STORAGE)),
        ("bound_storage_up", ItemSpec::par(IDX_STORAGE)),
        // Losses as a share of installed capacity
        ("storage_loss", ItemSpec::par(IDX_STORAGE)),
        // Initial reservoir content
        ("init_storage", ItemSpec::par(IDX_STORAGE)),
    ])
});

/// Items the MESSAGE variant adds to the base schema.
pub fn message_items() -> &'static IndexMap<&'static str, ItemSpec> {
    &MESSAGE_ITEMS
}

static MACRO_ITEMS: Lazy<IndexMap<&'static str, ItemSpec>> = Lazy::new(|| {
    IndexMap::from([
        // Economic sectors and their mapping onto commodities
        ("sector", ItemSpec::set(&[])),
        (
            "mapping_macro_sector",
            ItemSpec::set(&["sector", "commodity", "level"]),
        ),
        // Calibration parameters
        ("MERtoPPP", ItemSpec::par(&["node", "year"])),
        ("aeei", ItemSpec::par(&["node", "sector", "year"])),
        ("cost_MESSAGE", ItemSpec::par(&["node", "year"])),
        ("demand_MESSAGE", ItemSpec::par(&["node", "sector", "year"])),
        ("depr", ItemSpec::par(&["node"])),
        ("drate", ItemSpec::par(&["node"])),
        ("esub", ItemSpec::par(&["node"])),
        ("gdp_calibrate", ItemSpec::par(&["node", "year"])),
        ("grow", ItemSpec::par(&["node", "year"])),
        ("historical_gdp", ItemSpec::par(&["node", "year"])),
        ("kgdp", ItemSpec::par(&["node"])),
        ("kpvs", ItemSpec::par(&["node"])),
        ("lakl", ItemSpec::par(&["node"])),
        ("lotol", ItemSpec::par(&["node"])),
        ("prfconst", ItemSpec::par(&["node", "sector"])),
        ("price_MESSAGE", ItemSpec::par(&["node", "sector", "year"])),
        // Reported variables
        ("C", ItemSpec::var(&["node", "year"])),
        ("COST_NODAL", ItemSpec::var(&["node", "year"])),
        ("COST_NODAL_NET", ItemSpec::var(&["node", "year"])),
        (
            "DEMAND",
            ItemSpec::var(&["node", "commodity", "level", "year", "time"]),
        ),
        ("EC", ItemSpec::var(&["node", "year"])),
        ("GDP", ItemSpec::var(&["node", "year"])),
        ("I", ItemSpec::var(&["node", "year"])),
        ("K", ItemSpec::var(&["node", "year"])),
        ("KN", ItemSpec::var(&["node", "year"])),
        ("NEWLAB", ItemSpec::var(&["node", "year"])),
        ("PRODENE", ItemSpec::var(&["node", "sector", "year"])),
        ("UTILITY", ItemSpec::var(&[])),
        ("Y", ItemSpec::var(&["node", "year"])),
        ("YN", ItemSpec::var(&["node", "year"])),
        ("grow_calibrate", ItemSpec::var(&["node", "year"])),
        ("aeei_calibrate", ItemSpec::var(&["node", "sector", "year"])),
    ])
});

/// Items the MACRO variant adds to the base schema.
pub fn macro_items() -> &'static IndexMap<&'static str, ItemSpec> {
    &MACRO_ITEMS
}

/// Variables some platform backends refuse to initialize with an explicit
/// index structure. They are declared dimensionless instead; the model
/// source defines their indexing.
pub const UNINDEXED_MACRO_VARS: &[&str] =
    &["C", "COST_NODAL", "COST_NODAL_NET", "DEMAND", "GDP", "I"];

/// The MACRO table as actually declared on a scenario.
pub fn macro_items_for_init() -> IndexMap<&'static str, ItemSpec> {
    let mut items = MACRO_ITEMS.clone();
    for name in UNINDEXED_MACRO_VARS {
        if let Some(spec) = items.get_mut(name) {
            spec.idx_sets.clear();
            spec.idx_names = None;
        }
    }
    items
}
