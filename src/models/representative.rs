use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{day, Keyed};

/// Representative body (organo di rappresentanza) a person can sit on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeBody {
    pub id: i64,
    #[serde(rename = "nome", alias = "denominazione", default)]
    pub name: String,
}

impl Keyed for RepresentativeBody {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Structured assignment as some backend versions return it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeRecord {
    #[serde(
        default,
        alias = "personaRappresentanzaId",
        alias = "rappresentanteId",
        alias = "rappresentanzaId"
    )]
    pub id: Option<i64>,
    #[serde(rename = "organoRappresentanzaId", alias = "organoId", default)]
    pub body_id: Option<i64>,
    #[serde(rename = "organoRappresentanza", alias = "organo", default)]
    pub body: Option<RepresentativeBody>,
    #[serde(rename = "organoNome", default, skip_serializing_if = "Option::is_none")]
    pub body_name: Option<String>,
    #[serde(
        rename = "dataInizio",
        alias = "inizio",
        alias = "dal",
        default,
        deserialize_with = "day::option::deserialize"
    )]
    pub start: Option<NaiveDate>,
    #[serde(
        rename = "dataFine",
        alias = "fine",
        alias = "al",
        default,
        deserialize_with = "day::option::deserialize"
    )]
    pub end: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Name(String),
    Record(RepresentativeRecord),
}

/// A person's representative assignments, in whichever shape the backend sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepresentativeSource {
    NamesOnly(Vec<String>),
    Structured(Vec<RepresentativeRecord>),
}

impl Default for RepresentativeSource {
    fn default() -> Self {
        RepresentativeSource::NamesOnly(Vec::new())
    }
}

impl<'de> Deserialize<'de> for RepresentativeSource {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let entries = Option::<Vec<Entry>>::deserialize(d)?.unwrap_or_default();
        if entries.iter().all(|e| matches!(e, Entry::Name(_))) {
            let names = entries
                .into_iter()
                .filter_map(|e| match e {
                    Entry::Name(n) => Some(n),
                    Entry::Record(_) => None,
                })
                .collect();
            return Ok(RepresentativeSource::NamesOnly(names));
        }

        let records = entries
            .into_iter()
            .map(|e| match e {
                Entry::Name(n) => RepresentativeRecord {
                    body_name: Some(n),
                    ..Default::default()
                },
                Entry::Record(r) => r,
            })
            .collect();
        Ok(RepresentativeSource::Structured(records))
    }
}

impl Serialize for RepresentativeSource {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            RepresentativeSource::NamesOnly(names) => names.serialize(s),
            RepresentativeSource::Structured(records) => records.serialize(s),
        }
    }
}

/// Normalized row of the representatives tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepresentativeView {
    /// Assignment id; unknown when the backend only sent names.
    pub id: Option<i64>,
    pub body_id: Option<i64>,
    pub body_name: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl RepresentativeView {
    fn dedupe_key(&self) -> String {
        let name = fold(&self.body_name);
        if name.is_empty() {
            self.body_id.map(|id| format!("#{id}")).unwrap_or_default()
        } else {
            name
        }
    }

    fn same_body(&self, other: &RepresentativeView) -> bool {
        match (self.body_id, other.body_id) {
            (Some(a), Some(b)) => a == b,
            _ => fold(&self.body_name) == fold(&other.body_name),
        }
    }
}

fn fold(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn body_by_name<'a>(bodies: &'a [RepresentativeBody], name: &str) -> Option<&'a RepresentativeBody> {
    let name = fold(name);
    bodies.iter().find(|b| fold(&b.name) == name)
}

impl RepresentativeSource {
    /// One row per body: names resolved to body ids, duplicates dropped case-insensitively.
    pub fn to_views(&self, bodies: &[RepresentativeBody]) -> Vec<RepresentativeView> {
        let rows: Vec<RepresentativeView> = match self {
            RepresentativeSource::NamesOnly(names) => names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(|n| RepresentativeView {
                    id: None,
                    body_id: body_by_name(bodies, n).map(|b| b.id),
                    body_name: n.to_string(),
                    start: None,
                    end: None,
                })
                .collect(),
            RepresentativeSource::Structured(records) => records
                .iter()
                .filter_map(|r| {
                    let body_id = r.body_id.or_else(|| r.body.as_ref().map(|b| b.id));
                    let mut body_name = r
                        .body_name
                        .clone()
                        .or_else(|| r.body.as_ref().map(|b| b.name.clone()))
                        .unwrap_or_default()
                        .trim()
                        .to_string();
                    if body_name.is_empty() {
                        if let Some(found) = body_id.and_then(|id| bodies.iter().find(|b| b.id == id)) {
                            body_name = found.name.clone();
                        }
                    }
                    let body_id = body_id.or_else(|| body_by_name(bodies, &body_name).map(|b| b.id));
                    if body_id.is_none() && body_name.is_empty() {
                        return None;
                    }
                    Some(RepresentativeView {
                        id: r.id,
                        body_id,
                        body_name,
                        start: r.start,
                        end: r.end,
                    })
                })
                .collect(),
        };

        let mut seen = std::collections::HashSet::new();
        rows.into_iter()
            .filter(|row| seen.insert(row.dedupe_key()))
            .collect()
    }

    /// Reflect an added or edited assignment in the person's own list.
    pub fn upsert(&mut self, view: &RepresentativeView) {
        match self {
            RepresentativeSource::NamesOnly(names) => {
                let key = fold(&view.body_name);
                if !key.is_empty() && !names.iter().any(|n| fold(n) == key) {
                    names.push(view.body_name.clone());
                }
            }
            RepresentativeSource::Structured(records) => {
                let record = RepresentativeRecord {
                    id: view.id,
                    body_id: view.body_id,
                    body: None,
                    body_name: Some(view.body_name.clone()),
                    start: view.start,
                    end: view.end,
                };
                let pos = records.iter().position(|r| {
                    (view.id.is_some() && r.id == view.id)
                        || (view.body_id.is_some()
                            && r.body_id.or_else(|| r.body.as_ref().map(|b| b.id)) == view.body_id)
                });
                match pos {
                    Some(i) => records[i] = record,
                    None => records.insert(0, record),
                }
            }
        }
    }

    /// Drop an assignment from the person's own list.
    pub fn remove(&mut self, view: &RepresentativeView) {
        match self {
            RepresentativeSource::NamesOnly(names) => {
                let key = fold(&view.body_name);
                names.retain(|n| fold(n) != key);
            }
            RepresentativeSource::Structured(records) => records.retain(|r| {
                if view.id.is_some() {
                    r.id != view.id
                } else {
                    r.body_id.or_else(|| r.body.as_ref().map(|b| b.id)) != view.body_id
                }
            }),
        }
    }
}

/// Patch a view list the way a local edit would: replace the edited row,
/// else the row for the same body, else prepend.
pub fn patch_views(views: &mut Vec<RepresentativeView>, edited_id: Option<i64>, row: RepresentativeView) {
    let pos = edited_id
        .and_then(|id| views.iter().position(|v| v.id == Some(id)))
        .or_else(|| views.iter().position(|v| v.same_body(&row)));
    match pos {
        Some(i) => views[i] = row,
        None => views.insert(0, row),
    }
}

/// Body of representative create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepresentativeAssignmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "personaId")]
    pub person_id: i64,
    #[serde(rename = "organoRappresentanzaId")]
    pub body_id: i64,
    #[serde(rename = "dataInizio")]
    pub start: Option<NaiveDate>,
    #[serde(rename = "dataFine")]
    pub end: Option<NaiveDate>,
}
