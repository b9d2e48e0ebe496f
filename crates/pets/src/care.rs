use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mascotas_core::validation::parse_timestamp;
use mascotas_core::{CareEventId, DomainError, DomainResult, Entity, PetId, Rule, Validator};

labelled_enum!(
    /// Kind of care performed on a pet.
    CareType, "tipo_cuidado" {
        Vaccination => "Vacunación",
        Deworming => "Desparasitación",
        VetConsultation => "Consulta Veterinaria",
        Bath => "Baño",
    }
);

const DESCRIPTION_RULES: &[Rule<'static>] = &[Rule::Length { min: 2, max: 500 }];

/// A care event's replaceable attributes, including its owning pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareEventDraft {
    #[serde(rename = "tipo_cuidado")]
    pub care_type: CareType,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fecha_cuidado")]
    pub occurred_at: DateTime<Utc>,
    #[serde(rename = "mascota_id")]
    pub pet_id: PetId,
}

impl CareEventDraft {
    pub fn with_id(self, id: CareEventId) -> CareEvent {
        CareEvent {
            id,
            care_type: self.care_type,
            description: self.description,
            occurred_at: self.occurred_at,
            pet_id: self.pet_id,
        }
    }
}

/// A persisted care event. Always belongs to exactly one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareEvent {
    pub id: CareEventId,
    #[serde(rename = "tipo_cuidado")]
    pub care_type: CareType,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fecha_cuidado")]
    pub occurred_at: DateTime<Utc>,
    #[serde(rename = "mascota_id")]
    pub pet_id: PetId,
}

impl Entity for CareEvent {
    type Id = CareEventId;

    fn id(&self) -> CareEventId {
        self.id
    }
}

/// Creation payload. The owning pet comes from the URL, never from the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CareEventInput {
    #[serde(rename = "tipo_cuidado")]
    pub care_type: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "fecha_cuidado")]
    pub occurred_at: Option<String>,
}

impl CareEventInput {
    fn check(&self, v: &mut Validator) {
        v.text("tipo_cuidado", self.care_type.as_deref(), &[Rule::OneOf(CareType::LABELS)])
            .text("descripcion", self.description.as_deref(), DESCRIPTION_RULES)
            .text("fecha_cuidado", self.occurred_at.as_deref(), &[Rule::DateTimeShape]);
    }

    pub fn validate(&self) -> DomainResult<()> {
        let mut v = Validator::new();
        self.check(&mut v);
        v.finish()
    }

    /// Run both validation passes and bind the event to `pet_id`.
    pub fn into_draft(self, pet_id: PetId) -> DomainResult<CareEventDraft> {
        self.validate()?;
        self.build(pet_id)
    }

    fn build(self, pet_id: PetId) -> DomainResult<CareEventDraft> {
        let occurred_at = self
            .occurred_at
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| DomainError::invalid_datetime("fecha_cuidado debe ser RFC3339"))?;

        Ok(CareEventDraft {
            care_type: self.care_type.as_deref().unwrap_or_default().parse()?,
            description: self.description.unwrap_or_default(),
            occurred_at: occurred_at.with_timezone(&Utc),
            pet_id,
        })
    }
}

/// Full-replace payload. Unlike creation, the owning pet is a body field and
/// may move the event to a different pet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CareEventUpdateInput {
    #[serde(flatten)]
    pub details: CareEventInput,
    #[serde(rename = "mascota_id")]
    pub pet_id: Option<i64>,
}

impl CareEventUpdateInput {
    pub fn validate(&self) -> DomainResult<()> {
        let mut v = Validator::new();
        self.details.check(&mut v);
        v.positive("mascota_id", self.pet_id);
        v.finish()
    }

    pub fn into_draft(self) -> DomainResult<CareEventDraft> {
        self.validate()?;
        let pet_id = PetId::new(self.pet_id.unwrap_or_default())?;
        self.details.build(pet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pet() -> PetId {
        PetId::new(1).unwrap()
    }

    fn valid_input() -> CareEventInput {
        CareEventInput {
            care_type: Some("Consulta Veterinaria".to_string()),
            description: Some("Control anual".to_string()),
            occurred_at: Some("2024-06-01T10:30:00-03:00".to_string()),
        }
    }

    #[test]
    fn creation_binds_pet_from_caller_and_normalizes_to_utc() {
        let draft = valid_input().into_draft(pet()).unwrap();
        assert_eq!(draft.pet_id, pet());
        assert_eq!(draft.care_type, CareType::VetConsultation);
        assert_eq!(draft.occurred_at, Utc.with_ymd_and_hms(2024, 6, 1, 13, 30, 0).unwrap());
    }

    #[test]
    fn creation_body_cannot_choose_the_pet() {
        let input: CareEventInput = serde_json::from_str(
            r#"{"tipo_cuidado":"Baño","descripcion":"Baño mensual","fecha_cuidado":"2024-06-01T10:00:00Z","mascota_id":77}"#,
        )
        .unwrap();
        let draft = input.into_draft(pet()).unwrap();
        assert_eq!(draft.pet_id, pet());
    }

    #[test]
    fn every_care_type_label_is_accepted() {
        for label in CareType::LABELS {
            let mut input = valid_input();
            input.care_type = Some(label.to_string());
            let draft = input.into_draft(pet()).unwrap();
            assert_eq!(draft.care_type.as_str(), *label);
        }
    }

    #[test]
    fn partial_care_type_label_is_rejected() {
        let mut input = valid_input();
        input.care_type = Some("Consulta".to_string());
        let err = input.into_draft(pet()).unwrap_err();
        assert_eq!(err.fields()[0].field, "tipo_cuidado");
    }

    #[test]
    fn timestamp_without_offset_is_invalid_datetime() {
        let mut input = valid_input();
        input.occurred_at = Some("2024-06-01T10:30:00".to_string());
        let err = input.into_draft(pet()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDateTime(_)));
    }

    #[test]
    fn description_bounds() {
        let mut input = valid_input();
        input.description = Some("x".repeat(501));
        let err = input.into_draft(pet()).unwrap_err();
        assert_eq!(err.fields()[0].field, "descripcion");

        let mut input = valid_input();
        input.description = Some("x".repeat(500));
        assert!(input.into_draft(pet()).is_ok());
    }

    #[test]
    fn update_requires_positive_pet_id() {
        let input = CareEventUpdateInput {
            details: valid_input(),
            pet_id: None,
        };
        let err = input.into_draft().unwrap_err();
        assert_eq!(err.fields()[0].field, "mascota_id");

        let input = CareEventUpdateInput {
            details: valid_input(),
            pet_id: Some(-4),
        };
        assert!(matches!(input.into_draft().unwrap_err(), DomainError::Validation(_)));
    }

    #[test]
    fn update_can_move_event_to_another_pet() {
        let input: CareEventUpdateInput = serde_json::from_str(
            r#"{"tipo_cuidado":"Vacunación","descripcion":"Rabia","fecha_cuidado":"2024-06-01T10:00:00Z","mascota_id":9}"#,
        )
        .unwrap();
        let draft = input.into_draft().unwrap();
        assert_eq!(draft.pet_id.get(), 9);
        assert_eq!(draft.care_type, CareType::Vaccination);
    }

    #[test]
    fn care_event_serializes_timestamp_as_rfc3339_utc() {
        let event = valid_input()
            .into_draft(pet())
            .unwrap()
            .with_id(CareEventId::new(5).unwrap());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["fecha_cuidado"], "2024-06-01T13:30:00Z");
        assert_eq!(json["tipo_cuidado"], "Consulta Veterinaria");
        assert_eq!(json["mascota_id"], 1);
    }
}
