//! CRUD over the `resumes` table. Every query is scoped to the owning user.

use sqlx::SqlitePool;

use crate::models::resume::{ResumeData, ResumeRow, ResumeSummary};

pub async fn insert_resume(
    pool: &SqlitePool,
    user_id: i64,
    data: &ResumeData,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO resumes
            (user_id, name, email, phone, education, experience,
             campus_experience, skills, source_filename)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.education)
    .bind(&data.experience)
    .bind(&data.campus_experience)
    .bind(&data.skills)
    .bind(&data.source_filename)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Most recently updated first.
pub async fn list_resumes(pool: &SqlitePool, user_id: i64) -> Result<Vec<ResumeSummary>, sqlx::Error> {
    sqlx::query_as::<_, ResumeSummary>(
        r#"
        SELECT id, name, email, phone, source_filename, created_at, updated_at
        FROM resumes
        WHERE user_id = ?
        ORDER BY updated_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_resume(
    pool: &SqlitePool,
    resume_id: i64,
    user_id: i64,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = ? AND user_id = ?")
        .bind(resume_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Returns false when no row with that id belongs to `user_id`.
pub async fn update_resume(
    pool: &SqlitePool,
    resume_id: i64,
    user_id: i64,
    data: &ResumeData,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE resumes SET
            name = ?,
            email = ?,
            phone = ?,
            education = ?,
            experience = ?,
            campus_experience = ?,
            skills = ?,
            updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.education)
    .bind(&data.experience)
    .bind(&data.campus_experience)
    .bind(&data.skills)
    .bind(resume_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns false when no row with that id belongs to `user_id`.
pub async fn delete_resume(
    pool: &SqlitePool,
    resume_id: i64,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = ? AND user_id = ?")
        .bind(resume_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn create_user(pool: &SqlitePool, username: &str) -> i64 {
        sqlx::query("INSERT INTO users (username, email, password_hash, salt) VALUES (?, ?, 'h', 's')")
            .bind(username)
            .bind(format!("{username}@example.com"))
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    fn sample(name: &str) -> ResumeData {
        ResumeData {
            name: name.to_string(),
            email: "zs@example.com".to_string(),
            phone: "13800000000".to_string(),
            education: "清华大学 计算机科学".to_string(),
            campus_experience: "学生会".to_string(),
            source_filename: Some("resume.pdf".to_string()),
            ..ResumeData::default()
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let pool = test_pool().await;
        let user = create_user(&pool, "zhangsan").await;

        let id = insert_resume(&pool, user, &sample("张三")).await.unwrap();
        let row = get_resume(&pool, id, user).await.unwrap().unwrap();

        assert_eq!(row.name, "张三");
        assert_eq!(row.campus_experience, "学生会");
        assert_eq!(row.experience, "");
        assert_eq!(row.source_filename.as_deref(), Some("resume.pdf"));
    }

    #[tokio::test]
    async fn test_rows_are_invisible_to_other_users() {
        let pool = test_pool().await;
        let owner = create_user(&pool, "owner").await;
        let other = create_user(&pool, "other").await;
        let id = insert_resume(&pool, owner, &sample("张三")).await.unwrap();

        assert!(get_resume(&pool, id, other).await.unwrap().is_none());
        assert!(!update_resume(&pool, id, other, &sample("李四")).await.unwrap());
        assert!(!delete_resume(&pool, id, other).await.unwrap());
        assert!(list_resumes(&pool, other).await.unwrap().is_empty());

        let row = get_resume(&pool, id, owner).await.unwrap().unwrap();
        assert_eq!(row.name, "张三");
    }

    #[tokio::test]
    async fn test_update_overwrites_fields_and_keeps_source() {
        let pool = test_pool().await;
        let user = create_user(&pool, "zhangsan").await;
        let id = insert_resume(&pool, user, &sample("张三")).await.unwrap();

        let mut changed = sample("张三丰");
        changed.skills = "Rust, SQL".to_string();
        changed.source_filename = None;
        assert!(update_resume(&pool, id, user, &changed).await.unwrap());

        let row = get_resume(&pool, id, user).await.unwrap().unwrap();
        assert_eq!(row.name, "张三丰");
        assert_eq!(row.skills, "Rust, SQL");
        assert_eq!(row.source_filename.as_deref(), Some("resume.pdf"));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let pool = test_pool().await;
        let user = create_user(&pool, "zhangsan").await;
        let first = insert_resume(&pool, user, &sample("first")).await.unwrap();
        let second = insert_resume(&pool, user, &sample("second")).await.unwrap();

        let ids: Vec<i64> = list_resumes(&pool, user)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let pool = test_pool().await;
        let user = create_user(&pool, "zhangsan").await;
        let id = insert_resume(&pool, user, &sample("张三")).await.unwrap();

        assert!(delete_resume(&pool, id, user).await.unwrap());
        assert!(get_resume(&pool, id, user).await.unwrap().is_none());
        assert!(!delete_resume(&pool, id, user).await.unwrap());
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let pool = test_pool().await;
        let user = create_user(&pool, "zhangsan").await;
        let id = insert_resume(&pool, user, &sample("张三")).await.unwrap();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user)
            .execute(&pool)
            .await
            .unwrap();
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
