use crate::convert::{collection, flags, number, number_or, optional_number, Scalar};
use crate::discriminator::{resolve, Resolved, Symbol};
use crate::families::RecipeRegistry;
use crate::model::{GuildIngredient, Ingredient, IngredientKind, Recipe, RecipeId};
use crate::prelude::*;

const E_P_URL: &str = const_format::concatcp!(API_V2, "/recipes");
const V1_DETAILS_URL: &str = const_format::concatcp!(API_V1, "/recipe_details.json");

/// A recipe as both api versions send it. V1 sends every number as a string and names the id
/// `recipe_id`, V2 sends numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeContract {
    #[serde(alias = "recipe_id")]
    pub id: Scalar,
    pub output_item_id: Scalar,
    pub output_item_count: Option<Scalar>,
    pub min_rating: Option<Scalar>,
    pub time_to_craft_ms: Option<Scalar>,
    pub disciplines: Option<Vec<String>>,
    pub flags: Option<Vec<String>>,
    pub ingredients: Option<Vec<IngredientContract>>,
    pub guild_ingredients: Option<Vec<GuildIngredientContract>>,
    pub output_upgrade_id: Option<Scalar>,
    pub chat_link: Option<String>,
}

/// V1 ingredients are `{item_id, count}`, V2 ones `{type, id, count}`.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientContract {
    #[serde(alias = "item_id")]
    pub id: Scalar,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub count: Scalar,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuildIngredientContract {
    pub upgrade_id: Scalar,
    pub count: Scalar,
}

#[derive(Debug, Clone, Copy)]
pub struct RecipeConverter<'r> {
    recipes: &'r RecipeRegistry,
}

impl<'r> RecipeConverter<'r> {
    pub fn new(recipes: &'r RecipeRegistry) -> Self {
        Self { recipes }
    }

    pub fn convert(&self, raw: Value) -> crate::error::Result<Recipe> {
        let Resolved { kind, contract, .. } = resolve(raw, self.recipes)?;
        Ok(Recipe {
            id: number(&contract.id)?,
            kind,
            output_item_id: number(&contract.output_item_id)?,
            output_item_count: number_or(contract.output_item_count.as_ref(), 1)?,
            min_rating: number_or(contract.min_rating.as_ref(), 0)?,
            time_to_craft_ms: number_or(contract.time_to_craft_ms.as_ref(), 0)?,
            disciplines: flags(contract.disciplines.as_deref()),
            flags: flags(contract.flags.as_deref()),
            ingredients: collection(contract.ingredients, |ingredient| {
                Ok(Ingredient {
                    kind: ingredient
                        .kind
                        .as_deref()
                        .map(IngredientKind::parse_or_unknown)
                        .unwrap_or(IngredientKind::Item),
                    id: number(&ingredient.id)?,
                    count: number(&ingredient.count)?,
                })
            })?,
            guild_ingredients: collection(contract.guild_ingredients, |ingredient| {
                Ok(GuildIngredient {
                    upgrade_id: number(&ingredient.upgrade_id)?,
                    count: number(&ingredient.count)?,
                })
            })?,
            output_upgrade_id: optional_number(contract.output_upgrade_id.as_ref())?,
            chat_link: contract.chat_link,
        })
    }
}

pub struct Recipes;

impl EndPoint for Recipes {
    type RType = Vec<RecipeId>;
    fn get_url() -> &'static str {
        E_P_URL
    }
}

impl EndPointIds for Recipes {
    type Id = RecipeId;
    type RType = Vec<Value>;

    fn get_url() -> &'static str {
        E_P_URL
    }
}

pub fn get_recipe_ids<C: ServiceClient>(client: &C) -> Result<Vec<RecipeId>> {
    Ok(Recipes::get(client)?.content)
}

/// Recipes with `ids` from v2, in the order of `ids`.
pub fn get_recipes<C: ServiceClient>(
    client: &C,
    registries: &Registries,
    ids: &[RecipeId],
) -> Result<Vec<Recipe>> {
    let converter = RecipeConverter::new(&registries.recipes);
    super::get_converted::<Recipes, _, _>(client, ids, |recipe: &Recipe| recipe.id, |raw| {
        converter.convert(raw)
    })
}

/// One recipe from the legacy v1 api.
pub fn get_recipe_v1<C: ServiceClient>(
    client: &C,
    registries: &Registries,
    id: RecipeId,
) -> Result<Response<Recipe>> {
    let response = client
        .send::<Value>(&Request::new(V1_DETAILS_URL).query("recipe_id", id))
        .wrap_err_with(|| format!("failed to get recipe {id} from {V1_DETAILS_URL}"))?;
    let converter = RecipeConverter::new(&registries.recipes);
    response
        .try_map(|raw| converter.convert(raw))
        .wrap_err_with(|| format!("failed to convert recipe {id}"))
}
