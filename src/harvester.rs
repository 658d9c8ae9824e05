//! Harvest orchestrator
//!
//! Construction performs the one fatal check (course access); after that,
//! `load()` runs the full sweep and always returns whatever documents were
//! accumulated, however many categories or items failed along the way.
//! The sweep order is fixed: syllabus unconditionally, then each category
//! whose navigation tab is present.

use crate::captions::{CaptionFetcher, MediaCaptionLoader};
use crate::config::HarvestConfig;
use crate::document::Document;
use crate::extract::formats::ExtractorSet;
use crate::gateway::{Course, Gateway, GatewayError};
use crate::sections::{
    AnnouncementLoader, AssignmentLoader, FileLoader, ModuleLoader, PageLoader, SectionContext,
    SectionLoader, SyllabusLoader,
};
use crate::state::{LogLevel, LogStatement, RunContext};
use crate::HarvestError;
use std::sync::Arc;

/// One harvest run over one course
///
/// The dedup index and log live for the lifetime of this value; construct
/// a fresh harvester for a fresh traversal.
pub struct CourseHarvester {
    run: Arc<RunContext>,
    ctx: Arc<SectionContext>,
    syllabus: SyllabusLoader,
    pages: Arc<PageLoader>,
    announcements: AnnouncementLoader,
    assignments: Arc<AssignmentLoader>,
    files: Arc<FileLoader>,
    modules: ModuleLoader,
}

impl CourseHarvester {
    /// Builds a harvester and verifies the course is accessible
    ///
    /// # Arguments
    ///
    /// * `config` - Validated run configuration (credentials, flags, hosts)
    /// * `extractors` - Registered byte-format extractor collaborators
    /// * `caption_fetcher` - Caption-service client, if captions are wanted
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::CourseUnavailable`] when the remote denies
    /// access to the course; nothing useful can be harvested in that case.
    pub async fn new(
        config: HarvestConfig,
        extractors: ExtractorSet,
        caption_fetcher: Option<Arc<dyn CaptionFetcher>>,
    ) -> Result<Self, HarvestError> {
        crate::config::validate(&config)?;

        let gateway = Gateway::new(
            &config.course.api_url,
            &config.course.api_key,
            config.course.course_id,
        )?;

        let course = match gateway.fetch_course().await {
            Ok(course) => course,
            Err(e @ (GatewayError::Unauthorized { .. } | GatewayError::NotFound { .. })) => {
                return Err(HarvestError::CourseUnavailable {
                    course_id: config.course.course_id,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let run = Arc::new(RunContext::new());
        run.info(format!("Harvesting: {} ({})", course.name, course.id));

        let load_captions = config.harvest.load_media_captions;
        let captions = MediaCaptionLoader::new(
            if load_captions { caption_fetcher } else { None },
            run.clone(),
            config.embeds.caption_hostname.clone(),
        );

        let ctx = Arc::new(SectionContext::new(
            gateway,
            run.clone(),
            captions,
            course,
            config.embeds.ui_hostname.clone(),
            load_captions,
        ));

        let pages = Arc::new(PageLoader::new(ctx.clone()));
        let assignments = Arc::new(AssignmentLoader::new(ctx.clone()));
        let files = Arc::new(FileLoader::new(ctx.clone(), extractors));
        let modules = ModuleLoader::new(
            ctx.clone(),
            pages.clone(),
            assignments.clone(),
            files.clone(),
            config.harvest.index_external_urls,
        );

        Ok(Self {
            run,
            syllabus: SyllabusLoader::new(ctx.clone()),
            pages,
            announcements: AnnouncementLoader::new(ctx.clone()),
            assignments,
            files,
            modules,
            ctx,
        })
    }

    /// Runs the full sweep and returns every harvested document
    ///
    /// Never fails: category and item failures are logged and absorbed, so
    /// the caller always receives the documents that could be harvested
    /// plus the structured log describing what could not.
    pub async fn load(&self) -> Vec<Document> {
        let mut documents = Vec::new();

        documents.extend(self.syllabus.load_section().await);

        let tabs: Vec<String> = match self.ctx.gateway.list_tabs().await {
            Ok(tabs) => tabs.into_iter().map(|tab| tab.id).collect(),
            Err(e) => {
                self.run
                    .warn(format!("Error listing navigation tabs: {}", e));
                Vec::new()
            }
        };

        let sweep: [(&str, &dyn SectionLoader); 5] = [
            ("modules", &self.modules),
            ("pages", self.pages.as_ref()),
            ("announcements", &self.announcements),
            ("assignments", self.assignments.as_ref()),
            ("files", self.files.as_ref()),
        ];

        for (tab_id, loader) in sweep {
            if tabs.iter().any(|tab| tab == tab_id) {
                documents.extend(loader.load_section().await);
            }
        }

        let warnings = self.run.warning_count();
        if warnings > 0 {
            self.run
                .info(format!("{} item(s) were unable to be indexed.", warnings));
        }

        documents
    }

    /// Returns the structured log: statements filtered by `level`, plus the
    /// full error list
    ///
    /// `Info` returns only operator-facing statements; any other level
    /// returns the complete statement stream.
    pub fn get_details(&self, level: LogLevel) -> (Vec<LogStatement>, Vec<LogStatement>) {
        let statements = match level {
            LogLevel::Info => self.run.statements_at(LogLevel::Info),
            _ => self.run.statements(),
        };
        (statements, self.run.errors())
    }

    /// Files skipped because no registered extractor handles their type
    pub fn invalid_files(&self) -> Vec<String> {
        self.run.invalid_files()
    }

    /// The course record fetched at construction
    pub fn course(&self) -> &Course {
        &self.ctx.course
    }
}
