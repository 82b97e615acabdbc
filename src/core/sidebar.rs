//! # Sidebar
//!
//! What the front-end shows for the selected entity: a tag table, the
//! relations it belongs to, a meta table and a list of outbound links.
//! Each table fills in independently as its fetch completes.

use chrono::{DateTime, Local, TimeZone, Utc};
use log::warn;
use reqwest::Url;

use crate::map::LngLat;
use crate::osm::{Changeset, Entity, EntityRef, EntityStore, FetchError, Membership};

/// Half-width of the JOSM bounding box around the focus point, in degrees.
const JOSM_BBOX_MARGIN: f64 = 0.001;

/// Fill state of one sidebar table.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    /// Nothing selected.
    Idle,
    Loading,
    Ready(T),
    /// The entity does not exist (or no longer does).
    Absent,
    Failed(String),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Idle
    }
}

impl<T> Slot<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Slot::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Slot::Loading)
    }

    fn from_result<U>(result: &Result<U, FetchError>, build: impl FnOnce(&U) -> T) -> Self {
        match result {
            Ok(value) => Slot::Ready(build(value)),
            Err(FetchError::NotFound) => Slot::Absent,
            Err(e) => Slot::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkGroup {
    View,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub group: LinkGroup,
    pub label: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRow {
    pub relation: EntityRef,
    /// `name` tag, or the relation id.
    pub label: String,
    /// `type` tag, with the route value appended for route relations.
    pub kind: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTable {
    pub entity: EntityRef,
    pub version: u64,
    pub changeset: i64,
    /// `None` until the changeset has been fetched.
    pub comment: Option<String>,
    pub uploaded: Option<String>,
    pub user: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sidebar {
    pub target: Option<EntityRef>,
    pub links: Vec<Link>,
    pub tags: Slot<Vec<(String, String)>>,
    pub memberships: Slot<Vec<MembershipRow>>,
    pub meta: Slot<MetaTable>,
}

impl Sidebar {
    /// Sidebar for a fresh selection: links are known right away, the
    /// tables are waiting on fetches.
    pub fn loading(target: EntityRef, focus: Option<LngLat>) -> Self {
        Self {
            target: Some(target),
            links: links_for(target, focus),
            tags: Slot::Loading,
            memberships: Slot::Loading,
            meta: Slot::Loading,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.target.is_none()
    }

    pub fn set_entity(&mut self, result: &Result<Entity, FetchError>) {
        self.tags = Slot::from_result(result, |entity| {
            entity
                .tags
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        });
        self.meta = Slot::from_result(result, |entity| MetaTable {
            entity: entity.reference,
            version: entity.version,
            changeset: entity.changeset,
            comment: None,
            uploaded: entity.timestamp.map(|t| format_uploaded(t, &Local)),
            user: entity.user.clone(),
        });
    }

    /// Fills in the changeset comment. A failed lookup leaves the meta
    /// table as it is, with an empty comment.
    pub fn set_changeset(&mut self, result: &Result<Changeset, FetchError>) {
        let Slot::Ready(meta) = &mut self.meta else {
            return;
        };
        match result {
            Ok(changeset) => {
                meta.comment = Some(changeset.comment().unwrap_or_default().to_string());
            }
            Err(e) => {
                warn!("Changeset {} unavailable: {}", meta.changeset, e);
                meta.comment = Some(String::new());
            }
        }
    }

    pub fn set_memberships(
        &mut self,
        result: &Result<Vec<Membership>, FetchError>,
        store: &EntityStore,
    ) {
        self.memberships = Slot::from_result(result, |memberships| {
            memberships
                .iter()
                .map(|m| membership_row(m, store.cached(m.relation).as_ref()))
                .collect()
        });
    }
}

fn membership_row(membership: &Membership, relation: Option<&Entity>) -> MembershipRow {
    let tag = |key: &str| relation.and_then(|r| r.tags.get(key)).map(String::as_str);

    let label = tag("name")
        .map(str::to_string)
        .unwrap_or_else(|| membership.relation.id.to_string());
    let mut kind = tag("type").unwrap_or_default().to_string();
    if matches!(kind.as_str(), "route" | "superroute")
        && let Some(route) = tag("route")
    {
        kind = format!("{kind} ({route})");
    }

    MembershipRow {
        relation: membership.relation,
        label,
        kind,
        role: membership.role.clone(),
    }
}

/// `YYYY-MM-DD HH:MM:SS` in the given time zone.
pub fn format_uploaded<Tz: TimeZone>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp
        .with_timezone(tz)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn links_for(target: EntityRef, focus: Option<LngLat>) -> Vec<Link> {
    let kind = target.kind.name();
    let id = target.id;
    let overpass_query = format!("{kind}({id});\n(._;>;);\nout;");

    let mut links = vec![
        Link {
            group: LinkGroup::View,
            label: "osm.org",
            url: format!("https://openstreetmap.org/{target}"),
        },
        Link {
            group: LinkGroup::View,
            label: "XML",
            url: format!("https://www.openstreetmap.org/api/0.6/{target}"),
        },
        Link {
            group: LinkGroup::View,
            label: "PeWu",
            url: format!("https://pewu.github.io/osm-history/#/{target}"),
        },
    ];
    links.extend(with_params(
        LinkGroup::View,
        "Overpass Turbo",
        "https://overpass-turbo.eu/",
        &[("Q", overpass_query.as_str()), ("R", "")],
    ));
    links.push(Link {
        group: LinkGroup::Edit,
        label: "iD",
        url: format!("https://openstreetmap.org/edit?{kind}={id}"),
    });
    if let Some(focus) = focus {
        let left = (focus.lng - JOSM_BBOX_MARGIN).to_string();
        let right = (focus.lng + JOSM_BBOX_MARGIN).to_string();
        let top = (focus.lat + JOSM_BBOX_MARGIN).to_string();
        let bottom = (focus.lat - JOSM_BBOX_MARGIN).to_string();
        let select = format!("{kind}{id}");
        links.extend(with_params(
            LinkGroup::Edit,
            "JOSM",
            "http://127.0.0.1:8111/load_and_zoom",
            &[
                ("left", left.as_str()),
                ("right", right.as_str()),
                ("top", top.as_str()),
                ("bottom", bottom.as_str()),
                ("select", select.as_str()),
            ],
        ));
    }
    links.push(Link {
        group: LinkGroup::Edit,
        label: "Level0",
        url: format!("https://level0.osmz.ru/?url={target}"),
    });
    links
}

fn with_params(group: LinkGroup, label: &'static str, base: &str, params: &[(&str, &str)]) -> Option<Link> {
    match Url::parse_with_params(base, params) {
        Ok(url) => Some(Link {
            group,
            label,
            url: url.into(),
        }),
        Err(e) => {
            warn!("Skipping {} link: {}", label, e);
            None
        }
    }
}
