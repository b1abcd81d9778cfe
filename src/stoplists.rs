//! Embedded stopword lists.
//!
//! Used by the paragraph classifier (stopword density) and the language
//! filter (stoplist coverage). Lists are parsed once on first use.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

const ENGLISH: &str = "a about above across after afterwards again against all almost alone along already also \
although always am among amongst an and another any anyhow anyone anything anyway anywhere are around as at \
back be became because become becomes becoming been before beforehand behind being below beside besides between \
beyond both but by can cannot could did do does doing done down during each either else elsewhere enough etc even \
ever every everyone everything everywhere except few first for former formerly from further had has have having he \
hence her here hereafter hereby herein hers herself him himself his how however i if in indeed into is it its itself \
just last latter least less made many may me meanwhile might mine more moreover most mostly much must my myself \
namely neither never nevertheless next no nobody none noone nor not nothing now nowhere of off often on once one only \
onto or other others otherwise our ours ourselves out over own per perhaps please rather same see seem seemed seeming \
seems several she should since so some somehow someone something sometime sometimes somewhere still such than that \
the their theirs them themselves then thence there thereafter thereby therefore therein thereupon these they this \
those though through throughout thru thus to together too toward towards under until up upon us very was we well were \
what whatever when whence whenever where whereafter whereas whereby wherein whereupon wherever whether which while \
whither who whoever whole whom whose why will with within without would yet you your yours yourself yourselves";

const GERMAN: &str = "aber alle allem allen aller alles als also am an ander andere anderem anderen anderer anderes \
anderm andern anders auch auf aus bei bin bis bist da damit dann das dass dasselbe dazu dein deine deinem deinen \
deiner deines dem demselben den denn denselben der derer derselbe derselben des desselben dessen dich die dies diese \
dieselbe dieselben diesem diesen dieser dieses dir doch dort du durch ein eine einem einen einer eines einig einige \
einigem einigen einiger einiges einmal er es etwas euch euer eure eurem euren eurer eures für gegen gewesen hab habe \
haben hat hatte hatten hier hin hinter ich ihm ihn ihnen ihr ihre ihrem ihren ihrer ihres im in indem ins ist jede \
jedem jeden jeder jedes jene jenem jenen jener jenes jetzt kann kein keine keinem keinen keiner keines können könnte \
machen man manche manchem manchen mancher manches mein meine meinem meinen meiner meines mich mir mit muss musste \
nach nicht nichts noch nun nur ob oder ohne sehr sein seine seinem seinen seiner seines selbst sich sie sind so \
solche solchem solchen solcher solches soll sollte sondern sonst über um und uns unser unsere unserem unseren unserer \
unseres unter viel vom von vor während war waren warst was weg weil weiter welche welchem welchen welcher welches \
wenn werde werden wie wieder will wir wird wirst wo wollen wollte würde würden zu zum zur zwar zwischen";

const FRENCH: &str = "à ai aie aient aies ait alors as au aucun aura aurai auraient aurais aurait aussi autre aux \
avaient avais avait avant avec avez aviez avions avoir avons ayant bien c ce ceci cela celle celles celui ces cet \
cette ceux chaque comme comment d dans de depuis des deux devant doit donc dont du elle elles en encore entre es est \
et étaient étais était été être eu eux fait faire fois font hors ici il ils j je jusqu l la là le les leur leurs lui \
m ma mais me même mes moi mon n ne ni nos notre nous on ont ou où par parce pas peu peut plus pour pourquoi qu quand \
que quel quelle quelles quels qui s sa sans se sera serait ses si sien son sont sous soyez sur t ta tandis te tes \
toi ton tous tout toute toutes très tu un une vos votre vous y";

const SPANISH: &str = "a al algo algunas algunos ante antes como con contra cual cuando de del desde donde durante \
e el él ella ellas ellos en entre era erais eran eras eres es esa esas ese eso esos esta estaba estaban estado estar \
estas este esto estos fue fueron fui ha había habían han has hasta hay la las le les lo los más me mi mis mucho muchos \
muy nada ni no nos nosotros o os otra otras otro otros para pero poco por porque que quien quienes qué se sea ser \
si sí siempre sin sobre son su sus también tanto te tiene tienen todo todos tu tus un una uno unos vosotros y ya yo";

const ITALIAN: &str = "a abbia abbiamo ad agli ai al alla alle allo anche avere aveva avevano c che chi ci coi col \
come con contro cui da dagli dai dal dalla dalle dallo degli dei del dell della delle dello di dove e ed è era erano \
essere fa fra gli ha hanno ho i il in io la le lei li lo loro lui ma mi mia mie miei mio ne negli nei nel nella nelle \
nello noi non nostra nostro o per perché più quale quando quella quelle quelli quello questa queste questi questo se \
sei si sia siamo sono sta stato su sua sue sugli sui sul sulla sulle sullo suo suoi ti tra tu tua tuo tutti tutto \
un una uno vi voi";

const DUTCH: &str = "aan al alles als altijd andere ben bij daar dan dat de der deze die dit doch doen door dus een \
eens en er ge geen geweest haar had heb hebben heeft hem het hier hij hoe hun iemand iets ik in is ja je kan kon kunnen \
maar me meer men met mij mijn moet na naar niet niets nog nu of om omdat ons ook op over reeds te tegen toch toen tot \
u uit uw van veel voor want waren was wat we wel werd wezen wie wil worden wordt zal ze zelf zich zij zijn zo zonder \
zou";

const PORTUGUESE: &str = "a ao aos aquela aquelas aquele aqueles aquilo as até com como da das de dela delas dele \
deles depois do dos e ela elas ele eles em entre era eram essa essas esse esses esta estas este estes eu foi foram \
há isso isto já lhe lhes mais mas me mesmo meu meus minha minhas muito na não nas nem no nos nós nossa nossas nosso \
nossos num numa o os ou para pela pelas pelo pelos por qual quando que quem são se sem ser seu seus só sua suas \
também te tem tinha tu tua tuas um uma você vocês vos";

const SWEDISH: &str = "alla allt att av blev bli blir blivit de dem den denna deras dess dessa det detta dig din \
dina ditt du där då efter ej eller en er era ett från för ha hade han hans har henne hennes hon honom hur här i icke \
ingen inom inte jag ju kan kunde man med mellan men mig min mina mitt mot mycket ni nu när någon något några och om \
oss på samma sedan sig sin sina sitta själv skulle som så sådan till under upp ut utan vad var vara varför varit \
vars vart vem vi vid vilka vilken vilket vår våra vårt än är åt över";

const DANISH: &str = "ad af alle alt anden at blev blive bliver da de dem den denne der deres det dette dig din \
disse dog du efter eller en end er et for fra ham han hans har havde have hende hendes her hos hun hvad hvis hvor i \
ikke ind jeg jer jo kunne man mange med meget men mig min mine mit mod ned noget nogle nu når og også om op os over \
på selv sig sin sine sit skal skulle som sådan thi til ud under var vi vil ville vor være været";

/// Language code and raw list, in lookup order.
const LISTS: [(&str, &str); 9] = [
    ("en", ENGLISH),
    ("de", GERMAN),
    ("fr", FRENCH),
    ("es", SPANISH),
    ("it", ITALIAN),
    ("nl", DUTCH),
    ("pt", PORTUGUESE),
    ("sv", SWEDISH),
    ("da", DANISH),
];

static STOPLISTS: LazyLock<HashMap<&'static str, HashSet<&'static str>>> = LazyLock::new(|| {
    LISTS
        .iter()
        .map(|(code, words)| (*code, words.split_whitespace().collect()))
        .collect()
});

static UNION: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    STOPLISTS.values().flat_map(|list| list.iter().copied()).collect()
});

/// Stoplist of a language (ISO 639-1 code).
#[must_use]
pub fn for_language(code: &str) -> Option<&'static HashSet<&'static str>> {
    STOPLISTS.get(code.to_lowercase().as_str())
}

/// Union of all embedded stoplists.
#[must_use]
pub fn union() -> &'static HashSet<&'static str> {
    &UNION
}

/// All stoplists in a fixed order.
pub fn all() -> impl Iterator<Item = (&'static str, &'static HashSet<&'static str>)> {
    LISTS
        .iter()
        .filter_map(|(code, _)| STOPLISTS.get(code).map(|list| (*code, list)))
}
