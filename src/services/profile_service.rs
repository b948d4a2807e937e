// src/services/profile_service.rs

use std::io::Cursor;

use chrono::Utc;
use image::Luma;
use qrcode::QrCode;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        format::{non_empty, normalize_url, video_embed_url, whatsapp_link},
    },
    db::{RecordQuery, Repository},
    models::freelancer::{Freelancer, PublicProfile, UpdateProfileRequest, MAX_PORTFOLIO_IMAGES},
};

/// Slug público: letras minúsculas, dígitos e `-`, sem `-` nas pontas.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn trimmed(value: Option<String>) -> Option<String> {
    non_empty(&value).map(str::to_string)
}

#[derive(Clone)]
pub struct ProfileService {
    repo: Repository<Freelancer>,
    public_base_url: String,
}

impl ProfileService {
    pub fn new(repo: Repository<Freelancer>, public_base_url: String) -> Self {
        Self { repo, public_base_url: public_base_url.trim_end_matches('/').to_string() }
    }

    pub async fn get(&self, owner_id: Uuid) -> Result<Freelancer, AppError> {
        self.repo.find(owner_id, owner_id).await?.ok_or(AppError::NotFound("Perfil"))
    }

    /// Busca o cadastro sem falhar quando ele não existe (documentos saem
    /// sem os dados do contratado).
    pub async fn find(&self, owner_id: Uuid) -> Result<Option<Freelancer>, AppError> {
        self.repo.find(owner_id, owner_id).await
    }

    pub async fn update(&self, owner_id: Uuid, input: UpdateProfileRequest) -> Result<Freelancer, AppError> {
        let mut profile = self.get(owner_id).await?;

        if let Some(name) = input.name {
            profile.name = name.trim().to_string();
        }
        if let Some(v) = input.document {
            profile.document = trimmed(Some(v));
        }
        if let Some(v) = input.phone {
            profile.phone = trimmed(Some(v));
            profile.whatsapp_link = profile.phone.as_deref().and_then(whatsapp_link);
        }
        if let Some(v) = input.address {
            profile.address = trimmed(Some(v));
        }
        if let Some(v) = input.city {
            profile.city = trimmed(Some(v));
        }
        if let Some(v) = input.state {
            profile.state = trimmed(Some(v)).map(|s| s.to_uppercase());
        }

        if let Some(slug) = input.slug {
            let slug = slug.trim().to_lowercase();
            if !is_valid_slug(&slug) {
                return Err(AppError::invalid("slug", "Use apenas letras minúsculas, números e hífen."));
            }
            self.ensure_slug_free(owner_id, &slug).await?;
            profile.slug = Some(slug);
        }

        if let Some(v) = input.specialty {
            profile.specialty = trimmed(Some(v));
        }
        if let Some(v) = input.bio {
            profile.bio = trimmed(Some(v));
        }
        if let Some(v) = input.photo_url {
            profile.photo_url = normalize_url(&v);
        }
        if let Some(v) = input.video_url {
            profile.video_url = video_embed_url(&v);
        }
        if let Some(urls) = input.portfolio_urls {
            let urls: Vec<String> = urls.iter().filter_map(|u| normalize_url(u)).collect();
            if urls.len() > MAX_PORTFOLIO_IMAGES {
                return Err(AppError::invalid("portfolioUrls", "Máximo de 6 imagens no portfólio."));
            }
            profile.portfolio_urls = urls;
        }
        if let Some(published) = input.published {
            if published && profile.slug.is_none() {
                return Err(AppError::invalid("slug", "Defina um endereço público antes de publicar."));
            }
            profile.published = published;
        }

        profile.updated_at = Utc::now();
        self.repo.update(&profile).await?.ok_or(AppError::NotFound("Perfil"))
    }

    async fn ensure_slug_free(&self, owner_id: Uuid, slug: &str) -> Result<(), AppError> {
        let taken = self
            .repo
            .list(&RecordQuery::any_owner().with("slug", slug))
            .await?
            .into_iter()
            .any(|f| f.owner_id != owner_id);
        if taken {
            return Err(AppError::SlugTaken);
        }
        Ok(())
    }

    /// Perfil público; só existe quando publicado.
    pub async fn public_by_slug(&self, slug: &str) -> Result<PublicProfile, AppError> {
        let profile = self
            .repo
            .find_first(&RecordQuery::any_owner().with("slug", slug.trim().to_lowercase()))
            .await?
            .filter(|f| f.published)
            .ok_or(AppError::NotFound("Perfil"))?;

        Ok(PublicProfile {
            slug: profile.slug.unwrap_or_default(),
            display_name: profile.name,
            specialty: profile.specialty,
            bio: profile.bio,
            photo_url: profile.photo_url,
            whatsapp_link: profile.whatsapp_link,
            video_url: profile.video_url,
            portfolio_urls: profile.portfolio_urls.into_iter().take(MAX_PORTFOLIO_IMAGES).collect(),
        })
    }

    pub fn public_url(&self, slug: &str) -> String {
        format!("{}/p/{}", self.public_base_url, slug)
    }

    /// QR code (PNG) apontando para o perfil público.
    pub async fn qr_code_png(&self, slug: &str) -> Result<Vec<u8>, AppError> {
        let profile = self.public_by_slug(slug).await?;
        let url = self.public_url(&profile.slug);

        let code = QrCode::new(url.as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        // Renderiza para imagem
        let image_buffer = code.render::<Luma<u8>>().min_dimensions(256, 256).build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let mut png = Vec::new();
        dynamic_image
            .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::freelancer::{PlanType, SubscriptionStatus},
        services::testing::local_store,
    };

    async fn seeded(service: &ProfileService, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        service
            .repo
            .create(&Freelancer {
                id,
                owner_id: id,
                name: name.into(),
                email: format!("{}@email.com", id),
                document: None,
                phone: None,
                address: None,
                city: None,
                state: None,
                plan_type: PlanType::Free,
                subscription_status: SubscriptionStatus::Trial,
                trial_started_at: Some(now),
                trial_ends_at: None,
                marketing_opt_in: false,
                slug: None,
                specialty: None,
                bio: None,
                photo_url: None,
                whatsapp_link: None,
                video_url: None,
                portfolio_urls: vec![],
                published: false,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        id
    }

    fn service(dir: &std::path::Path) -> ProfileService {
        ProfileService::new(Repository::new(local_store(dir)), "https://app.exemplo.com.br/".into())
    }

    #[test]
    fn slug_rules() {
        assert!(is_valid_slug("joao-designer"));
        assert!(is_valid_slug("estudio42"));
        assert!(!is_valid_slug("João"));
        assert!(!is_valid_slug("-joao"));
        assert!(!is_valid_slug("joao designer"));
    }

    #[tokio::test]
    async fn update_derives_links_and_enforces_unique_slug() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let joao = seeded(&service, "João").await;
        let ana = seeded(&service, "Ana").await;

        let profile = service
            .update(
                joao,
                UpdateProfileRequest {
                    slug: Some("Joao-Designer".into()),
                    phone: Some("(11) 98765-4321".into()),
                    video_url: Some("https://youtu.be/abc123".into()),
                    portfolio_urls: Some(vec!["exemplo.com/1.png".into(), " ".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.slug.as_deref(), Some("joao-designer"));
        assert_eq!(profile.whatsapp_link.as_deref(), Some("https://wa.me/5511987654321"));
        assert_eq!(profile.video_url.as_deref(), Some("https://www.youtube.com/embed/abc123"));
        assert_eq!(profile.portfolio_urls, vec!["https://exemplo.com/1.png".to_string()]);

        // O próprio dono pode reenviar o mesmo slug
        service
            .update(joao, UpdateProfileRequest { slug: Some("joao-designer".into()), ..Default::default() })
            .await
            .unwrap();

        let err = service
            .update(ana, UpdateProfileRequest { slug: Some("joao-designer".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SlugTaken));
    }

    #[tokio::test]
    async fn public_profile_requires_publication() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let joao = seeded(&service, "João").await;

        service
            .update(joao, UpdateProfileRequest { slug: Some("joao".into()), ..Default::default() })
            .await
            .unwrap();
        assert!(matches!(service.public_by_slug("joao").await, Err(AppError::NotFound(_))));

        service
            .update(joao, UpdateProfileRequest { published: Some(true), ..Default::default() })
            .await
            .unwrap();
        let public = service.public_by_slug("joao").await.unwrap();
        assert_eq!(public.display_name, "João");

        let png = service.qr_code_png("joao").await.unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(service.public_url("joao"), "https://app.exemplo.com.br/p/joao");
    }

    #[tokio::test]
    async fn publishing_without_slug_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let joao = seeded(&service, "João").await;

        let err = service
            .update(joao, UpdateProfileRequest { published: Some(true), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidField("slug", _)));
    }
}
