//! `mbi dashboard` command - Interactive dashboard
//!
//! A page selector loop over the cached dataset. Filters and search are kept
//! per page while the session runs; "Refresh data" drops the cache so the
//! next render reloads the workbook.

use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use log::debug;
use miette::{Diagnostic, IntoDiagnostic, Result};

use crate::cli::commands::delivery::{self, DeliveryArgs};
use crate::cli::commands::inventory::{self, InventoryArgs};
use crate::cli::commands::projects::{self, ProjectsArgs};
use crate::cli::helpers::Context;
use crate::cli::GlobalOpts;
use crate::core::sheet::Sheet;
use crate::core::{Dataset, DatasetCache};
use crate::views;

#[derive(clap::Args, Debug)]
pub struct DashboardArgs {
    /// Page to open first
    #[arg(long, value_enum, default_value = "inventory")]
    pub page: Page,

    /// Do not clear the screen between pages
    #[arg(long)]
    pub no_clear: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Inventory,
    Delivery,
    Projects,
}

/// Filters remembered for each page during the session
#[derive(Debug, Default)]
struct Session {
    inventory: InventoryArgs,
    delivery: DeliveryArgs,
    projects: ProjectsArgs,
}

impl Session {
    fn search_mut(&mut self, page: Page) -> &mut Option<String> {
        match page {
            Page::Inventory => &mut self.inventory.search,
            Page::Delivery => &mut self.delivery.search,
            Page::Projects => &mut self.projects.search,
        }
    }

    fn clear(&mut self, page: Page) {
        match page {
            Page::Inventory => self.inventory = InventoryArgs::default(),
            Page::Delivery => self.delivery = DeliveryArgs::default(),
            Page::Projects => self.projects = ProjectsArgs::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Show(Page),
    Filter,
    Search,
    Clear,
    Refresh,
    Quit,
}

const ACTIONS: &[(&str, Action)] = &[
    ("Inventory", Action::Show(Page::Inventory)),
    ("Delivery", Action::Show(Page::Delivery)),
    ("Projects", Action::Show(Page::Projects)),
    ("Filter...", Action::Filter),
    ("Search...", Action::Search),
    ("Clear filters", Action::Clear),
    ("Refresh data", Action::Refresh),
    ("Quit", Action::Quit),
];

pub fn run(args: DashboardArgs, global: &GlobalOpts) -> Result<()> {
    let term = Term::stdout();
    if !term.is_term() {
        return Err(miette::miette!(
            help = "use `mbi status`, `mbi inventory` or another subcommand for non-interactive output",
            "the dashboard needs an interactive terminal"
        ));
    }

    let ctx = Context::new(global);
    let mut cache = DatasetCache::new(ctx.rules.clone());
    let mut session = Session::default();
    let mut page = args.page;
    let theme = ColorfulTheme::default();

    loop {
        if !args.no_clear {
            term.clear_screen().into_diagnostic()?;
        }

        let dataset = match cache.get(&ctx.workbook) {
            Ok(dataset) => Some(dataset),
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(e));
                None
            }
        };
        if let Some(dataset) = &dataset {
            render_page(page, dataset, &session, &ctx)?;
        }
        println!();

        let labels: Vec<&str> = ACTIONS.iter().map(|(label, _)| *label).collect();
        let default = ACTIONS
            .iter()
            .position(|(_, a)| *a == Action::Show(page))
            .unwrap_or(0);
        let choice = Select::with_theme(&theme)
            .with_prompt("Action")
            .items(&labels)
            .default(default)
            .interact_opt()
            .into_diagnostic()?;

        let action = choice.map_or(Action::Quit, |i| ACTIONS[i].1);
        debug!("dashboard action {:?} on {:?}", action, page);
        match action {
            Action::Show(next) => page = next,
            Action::Filter => {
                if let Some(dataset) = &dataset {
                    choose_filters(page, dataset, &mut session, &ctx, &theme)?;
                }
            }
            Action::Search => {
                let search = session.search_mut(page);
                let input: String = Input::with_theme(&theme)
                    .with_prompt("Search (empty to clear)")
                    .with_initial_text(search.clone().unwrap_or_default())
                    .allow_empty(true)
                    .interact_text()
                    .into_diagnostic()?;
                let input = input.trim().to_string();
                *search = (!input.is_empty()).then_some(input);
            }
            Action::Clear => session.clear(page),
            Action::Refresh => cache.invalidate(),
            Action::Quit => break,
        }
    }

    Ok(())
}

fn render_page(page: Page, dataset: &Dataset, session: &Session, ctx: &Context) -> Result<()> {
    let empty = Sheet::empty();
    let components = dataset.components.as_ref().unwrap_or(&empty);
    let shown = match page {
        Page::Inventory => {
            let view = views::inventory::build(components, &session.inventory.query(), &ctx.candidates);
            return inventory::render(&view, &session.inventory, ctx);
        }
        Page::Delivery => views::delivery::build(&dataset.sets, &session.delivery.query(), &ctx.candidates)
            .map(|view| delivery::render(&view, &session.delivery, ctx)),
        Page::Projects => views::projects::build(
            &dataset.projects,
            components,
            &session.projects.query(),
            &ctx.candidates,
        )
        .map(|view| projects::render(&view, &session.projects, ctx)),
    };

    match shown {
        Ok(rendered) => rendered,
        Err(e) => {
            println!("{}", style(&e).red().bold());
            if let Some(help) = e.help() {
                println!("{}", style(help).dim());
            }
            Ok(())
        }
    }
}

fn choose_filters(
    page: Page,
    dataset: &Dataset,
    session: &mut Session,
    ctx: &Context,
    theme: &ColorfulTheme,
) -> Result<()> {
    let empty = Sheet::empty();
    let components = dataset.components.as_ref().unwrap_or(&empty);
    match page {
        Page::Inventory => {
            let view = views::inventory::build(components, &Default::default(), &ctx.candidates);
            if !view.status_options.is_empty() {
                session.inventory.status =
                    multi_select(theme, "Status", &view.status_options, &session.inventory.status)?;
            }
            if !view.category_options.is_empty() {
                session.inventory.category =
                    multi_select(theme, "Category", &view.category_options, &session.inventory.category)?;
            }
        }
        Page::Delivery => {
            if let Ok(view) = views::delivery::build(&dataset.sets, &Default::default(), &ctx.candidates) {
                session.delivery.set = multi_select(theme, "Set", &view.set_options, &session.delivery.set)?;
            }
        }
        Page::Projects => {
            if let Ok(view) =
                views::projects::build(&dataset.projects, components, &Default::default(), &ctx.candidates)
            {
                session.projects.project =
                    multi_select(theme, "Project", &view.project_options, &session.projects.project)?;
            }
        }
    }
    Ok(())
}

/// Prompt for a subset of `options`; nothing ticked means no filter
fn multi_select(
    theme: &ColorfulTheme,
    prompt: &str,
    options: &[String],
    current: &[String],
) -> Result<Vec<String>> {
    let checked = checked_defaults(options, current);
    let picked = MultiSelect::with_theme(theme)
        .with_prompt(format!("{} (space to toggle, enter to apply)", prompt))
        .items(options)
        .defaults(&checked)
        .interact_opt()
        .into_diagnostic()?;

    Ok(match picked {
        Some(indices) => indices.into_iter().map(|i| options[i].clone()).collect(),
        // escape keeps the previous selection
        None => current.to_vec(),
    })
}

fn checked_defaults(options: &[String], current: &[String]) -> Vec<bool> {
    options
        .iter()
        .map(|o| current.iter().any(|c| c.eq_ignore_ascii_case(o)))
        .collect()
}
