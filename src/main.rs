use clap::Parser;
use schooldekho::adapters::export::Exporter;
use schooldekho::config::cli::{Command, SchoolArgs};
use schooldekho::core::directory::{submission_failure_message, LOAN_SUBMITTED};
use schooldekho::core::filter::{AlumniQuery, CampaignQuery, ScholarshipQuery};
use schooldekho::domain::model::{
    AlumniFacets, Alumnus, Campaign, FilterOptions, LoanApplication, LoanRecord, Scholarship,
    School,
};
use schooldekho::domain::ports::ConfigProvider;
use schooldekho::utils::error::Result;
use schooldekho::utils::format::{format_inr, format_percentage};
use schooldekho::utils::{logger, validation::Validate};
use schooldekho::{
    default_field_specs, CliConfig, FixtureCatalogue, HttpSchoolApi, LocalStorage,
    SchoolDirectory, Settings, TomlConfig,
};
use serde::Serialize;

type Directory = SchoolDirectory<HttpSchoolApi, LocalStorage>;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            Some(config)
        }
        None => None,
    };

    let settings = Settings::resolve(file_config.as_ref(), cli.overrides());
    settings.validate()?;
    tracing::debug!("Resolved settings: {:?}", settings);

    let api = HttpSchoolApi::from_config(&settings)?;
    let fixtures = match settings.fixtures_path() {
        Some(path) => FixtureCatalogue::with_overrides(LocalStorage::new(path)),
        None => FixtureCatalogue::embedded(),
    };
    let directory = SchoolDirectory::new(api, fixtures);
    let exporter = Exporter::new(LocalStorage::new(
        settings.output_path.clone().unwrap_or_else(|| ".".to_string()),
    ));
    let json = cli.json;

    match cli.command {
        Command::Schools(args) => {
            list_schools(&directory, &exporter, &settings, &args, json).await
        }
        Command::Show { id } => match directory.school(&id).await {
            Some(school) if json => print_json(&school),
            Some(school) => {
                print_school(&school);
                Ok(())
            }
            None => {
                println!("School not found.");
                Ok(())
            }
        },
        Command::Compare { ids, output } => {
            let table = directory.compare(&ids, &default_field_specs()).await?;
            if let Some(path) = output {
                exporter.export_table(&path, &table).await?;
                println!("📁 Comparison saved to: {}", path);
            } else if json {
                print_json(&table)?;
            } else {
                print!("{}", table);
            }
            Ok(())
        }
        Command::Options => {
            let options = directory.filter_options().await;
            if json {
                print_json(&options)
            } else {
                print_options(&options);
                Ok(())
            }
        }
        Command::Health => {
            match directory.health().await {
                Some(health) if json => print_json(&health)?,
                Some(health) if health.is_healthy() => println!("✅ API is healthy"),
                Some(health) => println!(
                    "⚠️ API is {}: {}",
                    health.status,
                    health.error.unwrap_or_default()
                ),
                None => println!("❌ API is unreachable at {}", directory.api().base_url()),
            }
            Ok(())
        }
        Command::Alumni {
            search,
            school,
            year,
        } => {
            let query = AlumniQuery {
                search,
                school,
                graduation_year: year,
            };
            let alumni = directory.alumni(&query).await;
            if json {
                print_json(&alumni)
            } else {
                print_alumni(&alumni, &directory.alumni_facets().await);
                Ok(())
            }
        }
        Command::Scholarships {
            search,
            category,
            min_amount,
        } => {
            let query = ScholarshipQuery {
                search,
                category: Some(category),
                min_amount,
            };
            let scholarships = directory.scholarships(&query).await;
            if json {
                print_json(&scholarships)
            } else {
                print_scholarships(&scholarships);
                Ok(())
            }
        }
        Command::Campaigns { search, category } => {
            let campaigns = directory
                .campaigns(&CampaignQuery { search, category })
                .await;
            if json {
                print_json(&campaigns)
            } else {
                print_campaigns(&campaigns);
                Ok(())
            }
        }
        Command::ApplyLoan(args) => {
            let application = LoanApplication::from(args);
            submit_loan(&directory, &application).await
        }
        Command::Loans { user_id } => {
            let loans = directory.loans(&user_id).await;
            if json {
                print_json(&loans)
            } else {
                print_loans(&loans);
                Ok(())
            }
        }
    }
}

async fn list_schools(
    directory: &Directory,
    exporter: &Exporter<LocalStorage>,
    settings: &Settings,
    args: &SchoolArgs,
    json: bool,
) -> Result<()> {
    let query = args.to_query(settings.page_size());
    let schools = directory.schools(&query).await;

    if let Some(path) = &args.output {
        exporter.export_schools(path, &schools).await?;
        println!("📁 {} schools saved to: {}", schools.len(), path);
        return Ok(());
    }
    if json {
        return print_json(&schools);
    }

    println!("Found {} schools", schools.len());
    if schools.is_empty() {
        println!("No schools found matching your criteria.");
    }
    for school in &schools {
        println!(
            "- {} [{}] {} | {} | ⭐ {} ({}) | Annual Fee {}",
            school.name,
            school.id,
            school.place(),
            school.board,
            school.rating,
            school.reviews_count,
            format_inr(school.fees.annual_fee)
        );
    }
    Ok(())
}

async fn submit_loan(directory: &Directory, application: &LoanApplication) -> Result<()> {
    match directory.submit_loan(application).await {
        Ok(receipt) => {
            println!("✅ {}", LOAN_SUBMITTED);
            println!("Application ID: {}", receipt.application_id);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", submission_failure_message(&e));
            std::process::exit(e.exit_code());
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_school(school: &School) {
    println!("{}", school.name);
    println!("  {} | {} | {}", school.school_type, school.board, school.place());
    if !school.location.address.is_empty() {
        println!("  Address: {}", school.location.address);
    }
    if let Some(year) = school.established_year {
        println!("  Established: {}", year);
    }
    println!("  Rating: {} ({} reviews)", school.rating, school.reviews_count);
    println!(
        "  Annual Fee: {} | Admission Fee: {}",
        format_inr(school.fees.annual_fee),
        format_inr(school.fees.admission_fee)
    );
    if !school.facilities.is_empty() {
        println!("  Facilities: {}", school.facilities.join(", "));
    }
    if !school.description.is_empty() {
        println!("  {}", school.description);
    }
    if let Some(phone) = &school.contact.phone {
        println!("  Phone: {}", phone);
    }
    if let Some(email) = &school.contact.email {
        println!("  Email: {}", email);
    }
    if let Some(website) = school.website_url() {
        println!("  Website: {}", website);
    }
}

fn print_options(options: &FilterOptions) {
    println!("School types: {}", options.school_types.join(", "));
    println!("Boards: {}", options.boards.join(", "));
    println!("Cities: {}", options.cities.join(", "));
}

fn print_alumni(alumni: &[Alumnus], facets: &AlumniFacets) {
    println!(
        "{} alumni shown, {} available for mentoring",
        alumni.len(),
        facets.available_mentors
    );
    if alumni.is_empty() {
        println!("No alumni match your search criteria. Try adjusting your filters.");
    }
    for alumnus in alumni {
        println!(
            "- {} ({}), {} at {} | {} | {}",
            alumnus.name,
            alumnus.graduation_year,
            alumnus.current_position,
            alumnus.company,
            alumnus.school,
            alumnus.availability
        );
    }
}

fn print_scholarships(scholarships: &[Scholarship]) {
    let today = chrono::Local::now().date_naive();
    if scholarships.is_empty() {
        println!("No scholarships found in this category.");
    }
    for scholarship in scholarships {
        println!(
            "- {} by {} | {} | {} | {}",
            scholarship.title,
            scholarship.provider,
            format_inr(scholarship.amount),
            scholarship.scholarship_type,
            scholarship.deadline_status(today)
        );
    }
}

fn print_campaigns(campaigns: &[Campaign]) {
    for campaign in campaigns {
        println!(
            "- {} ({}) | {} of {} raised ({}) | {} donors | {} days left",
            campaign.title,
            campaign.school,
            format_inr(campaign.raised_amount),
            format_inr(campaign.target_amount),
            format_percentage(campaign.progress_percentage()),
            campaign.donors,
            campaign.days_left
        );
    }
}

fn print_loans(loans: &[LoanRecord]) {
    if loans.is_empty() {
        println!("No loan applications found.");
    }
    for loan in loans {
        println!(
            "- {} | {} | {} | {}",
            loan.id,
            loan.application.student_name,
            format_inr(loan.application.loan_amount),
            loan.status
        );
    }
}
