use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mascotas_core::validation::parse_calendar_date;
use mascotas_core::{DomainError, DomainResult, Entity, PetId, Rule, Validator};

labelled_enum!(
    /// Animal species tracked by the system.
    Species, "especie" {
        Dog => "Perro",
        Cat => "Gato",
        Rabbit => "Conejo",
    }
);

labelled_enum!(
    Sex, "sexo" {
        Male => "Macho",
        Female => "Hembra",
    }
);

const NAME_RULES: &[Rule<'static>] = &[Rule::Length { min: 2, max: 100 }];
const BREED_RULES: &[Rule<'static>] = &[Rule::Length { min: 2, max: 100 }];

/// A pet's replaceable attributes, i.e. everything except its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "especie")]
    pub species: Species,
    #[serde(rename = "raza")]
    pub breed: String,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "sexo")]
    pub sex: Sex,
}

impl PetDraft {
    /// Attach a store-assigned identifier.
    pub fn with_id(self, id: PetId) -> Pet {
        Pet {
            id,
            name: self.name,
            species: self.species,
            breed: self.breed,
            birth_date: self.birth_date,
            sex: self.sex,
        }
    }
}

/// A persisted pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "especie")]
    pub species: Species,
    #[serde(rename = "raza")]
    pub breed: String,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "sexo")]
    pub sex: Sex,
}

impl Entity for Pet {
    type Id = PetId;

    fn id(&self) -> PetId {
        self.id
    }
}

/// Create/replace payload for a pet, as decoded from the request body.
///
/// Every field is optional at decode time so that missing values surface as
/// field errors rather than as decoding failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PetInput {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "especie")]
    pub species: Option<String>,
    #[serde(rename = "raza")]
    pub breed: Option<String>,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: Option<String>,
    #[serde(rename = "sexo")]
    pub sex: Option<String>,
}

impl PetInput {
    /// Shape validation: presence, lengths, allowed values, date pattern.
    pub fn validate(&self) -> DomainResult<()> {
        let mut v = Validator::new();
        v.text("nombre", self.name.as_deref(), NAME_RULES)
            .text("especie", self.species.as_deref(), &[Rule::OneOf(Species::LABELS)])
            .text("raza", self.breed.as_deref(), BREED_RULES)
            .text("fecha_nacimiento", self.birth_date.as_deref(), &[Rule::DateShape])
            .text("sexo", self.sex.as_deref(), &[Rule::OneOf(Sex::LABELS)]);
        v.finish()
    }

    /// Run both validation passes and build the draft.
    pub fn into_draft(self) -> DomainResult<PetDraft> {
        self.validate()?;

        let birth_date = self
            .birth_date
            .as_deref()
            .and_then(parse_calendar_date)
            .ok_or_else(|| DomainError::invalid_date("fecha_nacimiento debe ser YYYY-MM-DD"))?;

        Ok(PetDraft {
            name: self.name.unwrap_or_default(),
            species: self.species.as_deref().unwrap_or_default().parse()?,
            breed: self.breed.unwrap_or_default(),
            birth_date,
            sex: self.sex.as_deref().unwrap_or_default().parse()?,
        })
    }
}
