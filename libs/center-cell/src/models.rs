use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Center {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentersResponse {
    #[serde(default)]
    pub centers: Vec<Center>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCenterRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCenterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Role a user holds inside one center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Medic,
    Lead,
    #[serde(other)]
    Other,
}

impl MemberRole {
    /// Medics and leads can both be put on a shift.
    pub fn is_schedulable(&self) -> bool {
        matches!(self, MemberRole::Medic | MemberRole::Lead)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub user_id: String,
    pub role: MemberRole,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Member {
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if name.is_empty() {
            self.email.clone().unwrap_or_else(|| self.user_id.clone())
        } else {
            name
        }
    }

    pub fn is_lead(&self) -> bool {
        self.role == MemberRole::Lead
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersResponse {
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveMemberResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub future_shifts_removed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub medic_id: String,
    pub count: u32,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ReportRow {
    pub fn display_name(&self) -> String {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let name = name.trim();
        if name.is_empty() {
            self.email.clone().unwrap_or_else(|| self.medic_id.clone())
        } else {
            name.to_string()
        }
    }
}

/// Per-medic shift totals for one center and month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterReport {
    pub center_id: String,
    pub month: String,
    #[serde(default)]
    pub rows: Vec<ReportRow>,
    #[serde(default)]
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_roles_are_not_schedulable() {
        let member: Member = serde_json::from_value(json!({
            "user_id": "u1",
            "role": "observer"
        }))
        .unwrap();

        assert_eq!(member.role, MemberRole::Other);
        assert!(!member.role.is_schedulable());
        assert!(MemberRole::Medic.is_schedulable());
        assert!(MemberRole::Lead.is_schedulable());
    }

    #[test]
    fn center_reads_mongo_style_id() {
        let center: Center = serde_json::from_value(json!({
            "_id": "c1",
            "name": "SMURD Cluj"
        }))
        .unwrap();

        assert_eq!(center.id, "c1");
        assert!(center.location.is_none());
    }

    #[test]
    fn report_row_name_falls_back_to_email() {
        let row: ReportRow = serde_json::from_value(json!({
            "medic_id": "m1",
            "count": 4,
            "first_name": null,
            "last_name": "",
            "email": "m1@roster.test"
        }))
        .unwrap();

        assert_eq!(row.display_name(), "m1@roster.test");
    }
}
