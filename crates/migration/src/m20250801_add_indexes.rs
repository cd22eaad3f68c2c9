use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Every grade lookup is scoped to a user, most also to a course
        manager
            .create_index(
                Index::create()
                    .name("idx_student_grades_user_course")
                    .table(StudentGrades::Table)
                    .col(StudentGrades::UserId)
                    .col(StudentGrades::CourseCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_user_term")
                    .table(Enrollments::Table)
                    .col(Enrollments::UserId)
                    .col(Enrollments::Term)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_prerequisites_course_code")
                    .table(CoursePrerequisites::Table)
                    .col(CoursePrerequisites::CourseCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_program_requirements_program_id")
                    .table(ProgramRequirements::Table)
                    .col(ProgramRequirements::ProgramId)
                    .to_owned(),
            )
            .await?;

        // One work term per name for each user
        manager
            .create_index(
                Index::create()
                    .name("idx_work_terms_user_term_name")
                    .table(WorkTerms::Table)
                    .col(WorkTerms::UserId)
                    .col(WorkTerms::TermName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        for name in [
            "idx_work_terms_user_term_name",
            "idx_program_requirements_program_id",
            "idx_course_prerequisites_course_code",
            "idx_enrollments_user_term",
            "idx_student_grades_user_course",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum StudentGrades {
    Table,
    UserId,
    CourseCode,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    UserId,
    Term,
}

#[derive(Iden)]
enum CoursePrerequisites {
    Table,
    CourseCode,
}

#[derive(Iden)]
enum ProgramRequirements {
    Table,
    ProgramId,
}

#[derive(Iden)]
enum WorkTerms {
    Table,
    UserId,
    TermName,
}
