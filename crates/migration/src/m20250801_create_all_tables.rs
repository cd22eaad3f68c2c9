use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Course catalog
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::CourseCode).string().not_null())
                    .col(ColumnDef::new(Courses::CourseDays).string())
                    .col(ColumnDef::new(Courses::ClassTime).string())
                    .col(ColumnDef::new(Courses::CourseDuration).string())
                    .col(ColumnDef::new(Courses::Instructor).string())
                    .col(ColumnDef::new(Courses::ClassType).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProgramRequirements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProgramRequirements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProgramRequirements::ProgramId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProgramRequirements::Year).integer().not_null())
                    .col(
                        ColumnDef::new(ProgramRequirements::CourseCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProgramRequirements::CreditWeight)
                            .double()
                            .not_null()
                            .default(0.5),
                    )
                    .col(
                        ColumnDef::new(ProgramRequirements::RequirementType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProgramRequirements::MinGrade).double())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CoursePrerequisites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoursePrerequisites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CoursePrerequisites::CourseCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePrerequisites::PrerequisiteCode)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CoursePrerequisites::MinGrade).double())
                    .to_owned(),
            )
            .await?;

        // Grades are stored encrypted; `grade` holds the ciphertext
        manager
            .create_table(
                Table::create()
                    .table(StudentGrades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentGrades::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentGrades::UserId).string().not_null())
                    .col(ColumnDef::new(StudentGrades::CourseCode).string().not_null())
                    .col(ColumnDef::new(StudentGrades::RequirementId).uuid())
                    .col(ColumnDef::new(StudentGrades::Grade).text())
                    .col(ColumnDef::new(StudentGrades::Term).string().not_null())
                    .col(ColumnDef::new(StudentGrades::Year).integer().not_null())
                    .col(ColumnDef::new(StudentGrades::Status).string().not_null())
                    .col(
                        ColumnDef::new(StudentGrades::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(StudentGrades::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_grades-requirement_id")
                            .from(StudentGrades::Table, StudentGrades::RequirementId)
                            .to(ProgramRequirements::Table, ProgramRequirements::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::UserId).string().not_null())
                    .col(ColumnDef::new(Enrollments::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::Term).string().not_null())
                    .col(
                        ColumnDef::new(Enrollments::Status)
                            .string()
                            .not_null()
                            .default("enrolled"),
                    )
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-course_id")
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkTerms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkTerms::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkTerms::UserId).string().not_null())
                    .col(ColumnDef::new(WorkTerms::TermName).string().not_null())
                    .col(
                        ColumnDef::new(WorkTerms::Status)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(WorkTerms::CompanyName).string())
                    .col(
                        ColumnDef::new(WorkTerms::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first
        manager
            .drop_table(Table::drop().table(WorkTerms::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(StudentGrades::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CoursePrerequisites::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProgramRequirements::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    CourseCode,
    CourseDays,
    ClassTime,
    CourseDuration,
    Instructor,
    ClassType,
}

#[derive(Iden)]
enum ProgramRequirements {
    Table,
    Id,
    ProgramId,
    Year,
    CourseCode,
    CreditWeight,
    RequirementType,
    MinGrade,
}

#[derive(Iden)]
enum CoursePrerequisites {
    Table,
    Id,
    CourseCode,
    PrerequisiteCode,
    MinGrade,
}

#[derive(Iden)]
enum StudentGrades {
    Table,
    Id,
    UserId,
    CourseCode,
    RequirementId,
    Grade,
    Term,
    Year,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    Id,
    UserId,
    CourseId,
    Term,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum WorkTerms {
    Table,
    Id,
    UserId,
    TermName,
    Status,
    CompanyName,
    CreatedAt,
}
