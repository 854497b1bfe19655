//! Domain layer constants
//!
//! Values recorded into audit events and used by grading/pagination rules.
//! The Spanish strings are load-bearing: they are what the audit trail
//! stores and what the reporting filters match against.

// ============================================================================
// AUDIT MODULE NAMES
// ============================================================================

/// Module recorded for login/logout events
pub const MODULE_AUTENTICACION: &str = "Autenticación";

/// Module recorded for user and role administration events
pub const MODULE_USUARIOS: &str = "Usuarios";

/// Module recorded for course, assignment, and enrollment events
pub const MODULE_CURSOS: &str = "Cursos";

/// Module recorded for grade events
pub const MODULE_HISTORIAL: &str = "Historial";

// ============================================================================
// CLIENT METADATA SENTINELS
// ============================================================================

/// IP sentinel when a request context exists but carries no address
pub const IP_DESCONOCIDA: &str = "Desconocida";

/// IP sentinel for system-originated actions with no request context
pub const IP_NO_DISPONIBLE: &str = "No disponible";

/// Agent sentinel when the user-agent string is absent
pub const AGENTE_DESCONOCIDO: &str = "Desconocido";

// ============================================================================
// GRADING
// ============================================================================

/// Minimum weighted final grade considered passing
pub const NOTA_MINIMA_APROBACION: f64 = 70.0;

/// Upper bound for a component score and for a component weight percent
pub const NOTA_MAXIMA: f64 = 100.0;

// ============================================================================
// PAGINATION
// ============================================================================

/// Page size applied when the caller does not supply one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Hard ceiling on page size for audit reads
pub const MAX_PAGE_SIZE: u32 = 100;
