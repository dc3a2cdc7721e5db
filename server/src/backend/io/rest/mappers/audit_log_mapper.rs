use shared::AuditLogEntry as AuditLogEntryDto;

use crate::backend::domain::models::audit_log::AuditLogEntry;

pub struct AuditLogMapper;

impl AuditLogMapper {
    pub fn to_dto(domain: AuditLogEntry) -> AuditLogEntryDto {
        AuditLogEntryDto {
            id: domain.id,
            action: domain.action,
            user_email: domain.user_email,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain: Vec<AuditLogEntry>) -> Vec<AuditLogEntryDto> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
