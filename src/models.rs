use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::FieldError;

// --- Admin Users & Roles ---

/// Role
///
/// The closed set of admin roles. `SuperAdmin` satisfies every gate that
/// `Admin` does, plus the user-management endpoints. Encoded on the wire
/// and in the database as `admin` / `super_admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    #[default]
    Admin,
    SuperAdmin,
}

impl Role {
    /// Explicit role ordering: a role passes a gate when it is at least
    /// as privileged as the required role.
    pub fn satisfies(self, required: Role) -> bool {
        match (self, required) {
            (Role::SuperAdmin, _) => true,
            (Role::Admin, Role::Admin) => true,
            (Role::Admin, Role::SuperAdmin) => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "admin" => Some(Role::Admin),
            "super_admin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }
}

/// AdminUser
///
/// The canonical admin account record from the `admin_users` table.
/// Internal only: carries the password hash and therefore deliberately
/// does NOT implement `Serialize`. API responses use [`UserProfile`].
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// UserProfile
///
/// The wire representation of an admin account, stripped of credentials.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    #[ts(type = "string | null")]
    pub last_login: Option<DateTime<Utc>>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<AdminUser> for UserProfile {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            is_active: user.is_active,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

// --- Versioned Content Documents ---

/// EditorRef
///
/// Weak reference to the admin who last wrote a content version, enriched
/// on reads with name and email for the admin UI's "last edited by" line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditorRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// ContentRecord
///
/// One stored version of a content section. The client-supplied document
/// is opaque to the server beyond required-field validation; it is kept in
/// `data` and flattened to the top level of the JSON envelope, so the wire
/// shape matches what the admin panel posted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: Uuid,
    /// The content fields themselves, spread inline on (de)serialization.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    pub is_active: bool,
    pub updated_by: Option<EditorRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Singleton Config Sections ---

fn require_str(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::required(field));
    }
}

fn require_url(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if url::Url::parse(value).is_err() {
        errors.push(FieldError::new(field, format!("{} must be a valid URL", field)));
    }
}

/// NavbarConfig
///
/// Site navigation labels and social links. A singleton: one live value,
/// mutated in place via whitelist merge, no version history.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "PascalCase")]
#[ts(export)]
pub struct NavbarConfig {
    pub navbar_judul: String,
    pub navbar_sekolah: String,
    pub navbar_menu_mobile: String,
    pub navbar_home: String,
    pub navbar_struktur: String,
    pub navbar_program_kerja: String,
    pub navbar_kegiatan: String,
    pub navbar_ekskul: String,
    pub navbar_informasi: String,
    pub navbar_saran: String,
    pub navbar_admin: String,
    pub navbar_instagram_link: String,
    pub navbar_tiktok_link: String,
    pub navbar_copy_right: String,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            navbar_judul: "SIE 1 KETAQWAAN".to_string(),
            navbar_sekolah: "MAN 1 Jember".to_string(),
            navbar_menu_mobile: "Menu Navigasi".to_string(),
            navbar_home: "Beranda".to_string(),
            navbar_struktur: "Struktur Organisasi".to_string(),
            navbar_program_kerja: "Program Kerja".to_string(),
            navbar_kegiatan: "PHBI".to_string(),
            navbar_ekskul: "Ekstrakurikuler".to_string(),
            navbar_informasi: "Informasi".to_string(),
            navbar_saran: "Kotak Saran".to_string(),
            navbar_admin: "ADMIN".to_string(),
            navbar_instagram_link: "https://www.instagram.com".to_string(),
            navbar_tiktok_link: "https://www.tiktok.com".to_string(),
            navbar_copy_right: "© 2025 SIE 1 KETAQWAAN MAN 1 JEMBER".to_string(),
        }
    }
}

/// NavbarUpdate
///
/// Whitelisted partial update for [`NavbarConfig`]. Unknown keys in the
/// request body are dropped by serde rather than merged into stored state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "PascalCase")]
#[ts(export)]
pub struct NavbarUpdate {
    pub navbar_judul: Option<String>,
    pub navbar_sekolah: Option<String>,
    pub navbar_menu_mobile: Option<String>,
    pub navbar_home: Option<String>,
    pub navbar_struktur: Option<String>,
    pub navbar_program_kerja: Option<String>,
    pub navbar_kegiatan: Option<String>,
    pub navbar_ekskul: Option<String>,
    pub navbar_informasi: Option<String>,
    pub navbar_saran: Option<String>,
    pub navbar_admin: Option<String>,
    pub navbar_instagram_link: Option<String>,
    pub navbar_tiktok_link: Option<String>,
    pub navbar_copy_right: Option<String>,
}

impl NavbarConfig {
    pub fn apply(&mut self, patch: NavbarUpdate) {
        let NavbarUpdate {
            navbar_judul,
            navbar_sekolah,
            navbar_menu_mobile,
            navbar_home,
            navbar_struktur,
            navbar_program_kerja,
            navbar_kegiatan,
            navbar_ekskul,
            navbar_informasi,
            navbar_saran,
            navbar_admin,
            navbar_instagram_link,
            navbar_tiktok_link,
            navbar_copy_right,
        } = patch;
        merge(&mut self.navbar_judul, navbar_judul);
        merge(&mut self.navbar_sekolah, navbar_sekolah);
        merge(&mut self.navbar_menu_mobile, navbar_menu_mobile);
        merge(&mut self.navbar_home, navbar_home);
        merge(&mut self.navbar_struktur, navbar_struktur);
        merge(&mut self.navbar_program_kerja, navbar_program_kerja);
        merge(&mut self.navbar_kegiatan, navbar_kegiatan);
        merge(&mut self.navbar_ekskul, navbar_ekskul);
        merge(&mut self.navbar_informasi, navbar_informasi);
        merge(&mut self.navbar_saran, navbar_saran);
        merge(&mut self.navbar_admin, navbar_admin);
        merge(&mut self.navbar_instagram_link, navbar_instagram_link);
        merge(&mut self.navbar_tiktok_link, navbar_tiktok_link);
        merge(&mut self.navbar_copy_right, navbar_copy_right);
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_str(&mut errors, "NavbarJudul", &self.navbar_judul);
        require_str(&mut errors, "NavbarSekolah", &self.navbar_sekolah);
        errors
    }
}

/// FooterConfig
///
/// Footer description, social links and the school address block.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "PascalCase")]
#[ts(export)]
pub struct FooterConfig {
    pub footer_deskripsi: String,
    pub footer_link_instagram: String,
    pub footer_link_tiktok: String,
    pub footer_alamat_jalan: String,
    pub footer_alamat_kecamatan: String,
    pub footer_alamat_kota: String,
    pub footer_alamat_provinsi: String,
    pub footer_narahubung: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            footer_deskripsi:
                "Sie 1 Ketaqwaan adalah organisasi yang berada di lingkungan MAN 1 JEMBER."
                    .to_string(),
            footer_link_instagram: "/page-html/page-comingsoon.html".to_string(),
            footer_link_tiktok: "/page-html/page-comingsoon.html".to_string(),
            footer_alamat_jalan: "Jl. Imam Bonjol No.50".to_string(),
            footer_alamat_kecamatan: "Kaliwates Kidul, Kaliwates,".to_string(),
            footer_alamat_kota: "Kec. Kaliwates, Kabupaten Jember,".to_string(),
            footer_alamat_provinsi: "Jawa Timur 68131.".to_string(),
            footer_narahubung: "Jika ada eror hubungi Admin yaaa 🤩".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "PascalCase")]
#[ts(export)]
pub struct FooterUpdate {
    pub footer_deskripsi: Option<String>,
    pub footer_link_instagram: Option<String>,
    pub footer_link_tiktok: Option<String>,
    pub footer_alamat_jalan: Option<String>,
    pub footer_alamat_kecamatan: Option<String>,
    pub footer_alamat_kota: Option<String>,
    pub footer_alamat_provinsi: Option<String>,
    pub footer_narahubung: Option<String>,
}

impl FooterConfig {
    pub fn apply(&mut self, patch: FooterUpdate) {
        let FooterUpdate {
            footer_deskripsi,
            footer_link_instagram,
            footer_link_tiktok,
            footer_alamat_jalan,
            footer_alamat_kecamatan,
            footer_alamat_kota,
            footer_alamat_provinsi,
            footer_narahubung,
        } = patch;
        merge(&mut self.footer_deskripsi, footer_deskripsi);
        merge(&mut self.footer_link_instagram, footer_link_instagram);
        merge(&mut self.footer_link_tiktok, footer_link_tiktok);
        merge(&mut self.footer_alamat_jalan, footer_alamat_jalan);
        merge(&mut self.footer_alamat_kecamatan, footer_alamat_kecamatan);
        merge(&mut self.footer_alamat_kota, footer_alamat_kota);
        merge(&mut self.footer_alamat_provinsi, footer_alamat_provinsi);
        merge(&mut self.footer_narahubung, footer_narahubung);
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_str(&mut errors, "FooterDeskripsi", &self.footer_deskripsi);
        require_str(&mut errors, "FooterAlamatJalan", &self.footer_alamat_jalan);
        errors
    }
}

/// InformasiConfig
///
/// The announcement block linking to the membership results dashboard.
/// Field spelling `InfomasiLink` is kept as the frontend already binds it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "PascalCase")]
#[ts(export)]
pub struct InformasiConfig {
    pub informasi_judul: String,
    pub informasi_deskripsi: String,
    pub infomasi_link: String,
}

impl Default for InformasiConfig {
    fn default() -> Self {
        Self {
            informasi_judul: "INFORMASI".to_string(),
            informasi_deskripsi:
                "Pengumuman tentang siapa saja yang lolos menjadi anggota sie 1 ketaqwaan MAN 1 Jember."
                    .to_string(),
            infomasi_link:
                "https://lookerstudio.google.com/reporting/dcf3ad5b-7817-4c57-b6ed-3bf6e96e6d96"
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "PascalCase")]
#[ts(export)]
pub struct InformasiUpdate {
    pub informasi_judul: Option<String>,
    pub informasi_deskripsi: Option<String>,
    pub infomasi_link: Option<String>,
}

impl InformasiConfig {
    pub fn apply(&mut self, patch: InformasiUpdate) {
        let InformasiUpdate {
            informasi_judul,
            informasi_deskripsi,
            infomasi_link,
        } = patch;
        merge(&mut self.informasi_judul, informasi_judul);
        merge(&mut self.informasi_deskripsi, informasi_deskripsi);
        merge(&mut self.infomasi_link, infomasi_link);
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_str(&mut errors, "InformasiJudul", &self.informasi_judul);
        require_str(&mut errors, "InformasiDeskripsi", &self.informasi_deskripsi);
        require_url(&mut errors, "InfomasiLink", &self.infomasi_link);
        errors
    }
}

/// SaranConfig
///
/// The anonymous suggestion-box block and its external form link.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "PascalCase")]
#[ts(export)]
pub struct SaranConfig {
    pub saran_judul: String,
    pub saran_deskripsi: String,
    pub saran_sub_deskripsi: String,
    pub saran_link: String,
}

impl Default for SaranConfig {
    fn default() -> Self {
        Self {
            saran_judul: "Kotak Saran".to_string(),
            saran_deskripsi: "Berikan semua kritik, saran, dan apresiasi anda kepada kami😊"
                .to_string(),
            saran_sub_deskripsi:
                "Tenang semua masukan yang anda berikan akan bersifat anonim😶‍🌫️ jadi jangan ragu untuk bersuara yaaa🤩"
                    .to_string(),
            saran_link: "https://kotaksaran-ketaqwaanman1jember.vercel.app/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "PascalCase")]
#[ts(export)]
pub struct SaranUpdate {
    pub saran_judul: Option<String>,
    pub saran_deskripsi: Option<String>,
    pub saran_sub_deskripsi: Option<String>,
    pub saran_link: Option<String>,
}

impl SaranConfig {
    pub fn apply(&mut self, patch: SaranUpdate) {
        let SaranUpdate {
            saran_judul,
            saran_deskripsi,
            saran_sub_deskripsi,
            saran_link,
        } = patch;
        merge(&mut self.saran_judul, saran_judul);
        merge(&mut self.saran_deskripsi, saran_deskripsi);
        merge(&mut self.saran_sub_deskripsi, saran_sub_deskripsi);
        merge(&mut self.saran_link, saran_link);
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_str(&mut errors, "SaranJudul", &self.saran_judul);
        require_str(&mut errors, "SaranDeskripsi", &self.saran_deskripsi);
        require_str(&mut errors, "SaranSubDeskripsi", &self.saran_sub_deskripsi);
        require_url(&mut errors, "SaranLink", &self.saran_link);
        errors
    }
}

fn merge(slot: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *slot = value;
    }
}

// --- Auth Payloads ---

/// LoginRequest
///
/// Input payload for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// LoginResponse
///
/// Successful login: a signed bearer token plus the account profile.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// ChangePasswordRequest
///
/// Input payload for `PUT /api/auth/change-password`. The current
/// password is re-verified before the new hash is stored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// RegisterUserRequest
///
/// Input payload for `POST /api/auth/register` (super_admin only).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

// --- Misc Responses ---

/// UploadResponse
///
/// Result of a content image upload: the public URL to embed in content
/// documents, plus the storage key for later reference.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UploadResponse {
    pub message: String,
    pub image_url: String,
    pub public_id: String,
}

/// HealthResponse
///
/// Body of `GET /api/health`, used by uptime monitors.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
    #[ts(type = "string")]
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}
