// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::Path;

use trendmind::catalog::{CacheStore, ModelCatalog, ModelQuery, SortOrder, StaticCatalog};
use trendmind::cli::output::{emit, render_comparison, render_model, render_model_list};
use trendmind::cli::{
    CompareArgs, FavoritesArgs, FavoritesCommands, ListArgs, OutputFormat, SearchArgs, ServeArgs,
    SettingsArgs, SettingsCommands, ShowArgs,
};
use trendmind::config::Settings;
use trendmind::error::Result;
use trendmind::favorites::FavoritesStore;
use trendmind::server::{self, AppState};

/// Build the catalog, restoring the cache snapshot when persistence is on
fn open_catalog(settings: &Settings) -> ModelCatalog {
    let catalog = ModelCatalog::from_settings(settings);
    if settings.cache.persist {
        catalog.with_cache(CacheStore::load_from(&settings.cache_path()))
    } else {
        catalog
    }
}

/// Write the cache snapshot back. Failures only cost the next run a refetch.
fn persist_catalog(catalog: &ModelCatalog, settings: &Settings) {
    if !settings.cache.persist {
        return;
    }
    let path = settings.cache_path();
    if let Err(e) = catalog.cache().save_to(&path) {
        tracing::warn!("Failed to save catalog cache to {}: {}", path.display(), e);
    }
}

/// Run the list command
pub(super) async fn run_list(
    args: ListArgs,
    settings: &Settings,
    format: &OutputFormat,
) -> Result<()> {
    let sort = args.sort.as_deref().unwrap_or(&settings.defaults.sort);
    let mut query = ModelQuery::default()
        .with_limit(args.limit.unwrap_or(settings.defaults.limit))
        .with_sort(SortOrder::parse(sort))
        .with_filter(args.filter.unwrap_or_default());
    if args.refresh {
        query = query.refreshed();
    }

    let catalog = open_catalog(settings);
    let models = catalog.get_models(&query).await?;
    persist_catalog(&catalog, settings);

    emit(format, &models, || render_model_list(&models))
}

/// Run the show command
pub(super) async fn run_show(
    args: ShowArgs,
    settings: &Settings,
    format: &OutputFormat,
) -> Result<()> {
    let catalog = open_catalog(settings);
    let model = catalog.get_model_by_id(&args.id, args.refresh).await;
    persist_catalog(&catalog, settings);

    emit(format, &model, || render_model(&model))
}

/// Run the search command
pub(super) async fn run_search(
    args: SearchArgs,
    settings: &Settings,
    format: &OutputFormat,
) -> Result<()> {
    let catalog = open_catalog(settings);
    let limit = args.limit.unwrap_or(settings.defaults.limit);
    let models = catalog.search_models(&args.query, limit).await?;
    persist_catalog(&catalog, settings);

    emit(format, &models, || render_model_list(&models))
}

/// Run the compare command
pub(super) async fn run_compare(
    args: CompareArgs,
    settings: &Settings,
    format: &OutputFormat,
) -> Result<()> {
    let catalog = open_catalog(settings);
    let comparison = catalog.compare_models(&args.ids).await;
    persist_catalog(&catalog, settings);

    emit(format, &comparison, || render_comparison(&comparison))
}

/// Run favorites subcommands
pub(super) async fn run_favorites_command(
    args: FavoritesArgs,
    settings: &Settings,
    format: &OutputFormat,
) -> Result<()> {
    let user = args.user.as_deref().unwrap_or(&settings.defaults.user);
    let mut store = FavoritesStore::open()?;

    match args.command {
        FavoritesCommands::List => {
            let ids = store.list(user).to_vec();
            let catalog = open_catalog(settings);
            let models = catalog.favorite_models(&ids).await;
            persist_catalog(&catalog, settings);

            emit(format, &models, || render_model_list(&models))?;
        }
        FavoritesCommands::Add { id } => {
            if store.add(user, &id)? {
                println!("Added '{}' to favorites of {}.", id, user);
            } else {
                println!("'{}' is already a favorite of {}.", id, user);
            }
        }
        FavoritesCommands::Remove { id } => {
            if store.remove(user, &id)? {
                println!("Removed '{}' from favorites of {}.", id, user);
            } else {
                println!("'{}' is not a favorite of {}.", id, user);
            }
        }
    }
    Ok(())
}

/// Run the catalog backend server
pub(super) async fn run_serve(args: ServeArgs, settings: &Settings) -> Result<()> {
    let host = args.host.as_deref().unwrap_or(&settings.server.host);
    let port = args.port.unwrap_or(settings.server.port);

    let state = AppState::new(StaticCatalog::from_settings(settings));
    // Surface a broken dataset before accepting connections
    let count = state.catalog.records()?.len();
    tracing::info!("Serving {} models", count);

    server::serve(state, host, port).await
}

/// Run settings subcommands
pub(super) fn run_settings_command(
    args: SettingsArgs,
    settings: &Settings,
    path: &Path,
) -> Result<()> {
    match args.command {
        SettingsCommands::Show => {
            let json = serde_json::to_string_pretty(settings)?;
            println!("{}", json);
        }
        SettingsCommands::Path => {
            println!("{}", path.display());
        }
        SettingsCommands::Reset => {
            Settings::default().save_to(path)?;
            println!("Settings reset to defaults.");
        }
    }
    Ok(())
}
